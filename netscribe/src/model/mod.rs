//! Typed records produced from switch output.
//!
//! Optional fields are either a real value or `None`; sentinel text never
//! survives normalization. Interface names are the stable keys used in
//! every collection.

mod lldp;
mod mac;
mod optics;
mod poe;
mod status;
mod tdr;

pub use lldp::{ChassisId, InterfaceLldp};
pub use mac::MacAddress;
pub use optics::{InterfaceOptics, OpticAlert, OpticReading};
pub use poe::{PoeHost, PoePort, PoeStatus};
pub use status::{InterfaceStatus, LinkState, MediaInfo};
pub use tdr::{InterfaceTdr, PairResult, TdrStatus};
