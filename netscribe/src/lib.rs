//! # Netscribe
//!
//! Async CLI session automation and template-driven record extraction for
//! network switches.
//!
//! Netscribe keeps a resilient terminal session to a switch, runs commands
//! and configuration batches with retry and reconnect, and turns the
//! human-oriented CLI output into typed, validated records.
//!
//! ## Features
//!
//! - Async SSH connections via russh, pluggable [`Connector`]s for other transports
//! - Retry with session revalidation; command failures captured in [`Response`]s
//! - TextFSM templates with `#NAME#` regex fragment expansion
//! - One field table normalizing speeds, MACs, IPs, optical alerts and TDR results
//! - Vendor capability table for Cisco IOS and Brocade/Ruckus FastIron
//! - Bounded submit-then-poll collection for TDR cable tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netscribe::{SessionBuilder, Switch, TemplateChoice, Vendor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), netscribe::Error> {
//!     let profile = Vendor::Cisco.profile();
//!     let mut session = SessionBuilder::new("192.168.1.1")
//!         .username("admin")
//!         .password("secret")
//!         .vendor(&profile)
//!         .build()?;
//!
//!     if !session.connect(3, None).await? {
//!         return Ok(());
//!     }
//!
//!     let mut switch = Switch::new(session, profile);
//!     switch.prepare().await?;
//!     switch.refresh_hostname().await?;
//!
//!     let status = switch.get_interface_status(TemplateChoice::Default).await?;
//!     for (name, interface) in status.records.unwrap_or_default() {
//!         println!("{name}: {} {:?}", interface.state, interface.speed_mbps);
//!     }
//!
//!     switch.session_mut().disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod collector;
pub mod device;
pub mod error;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod platform;
pub mod session;
pub mod template;
pub mod transport;

// Re-export main types for convenience
pub use collector::{PollOutcome, PollSettings, PollingCollector, select_tdr_targets};
pub use device::{Switch, TdrReport, TemplateChoice};
pub use error::{Error, FailureKind, Result};
pub use extract::{ExtractOptions, PatternMatcher, Row, TextFsmMatcher, extract};
pub use model::{
    ChassisId, InterfaceLldp, InterfaceOptics, InterfaceStatus, InterfaceTdr, LinkState, MacAddress,
    MediaInfo, OpticAlert, OpticReading, PairResult, PoeHost, PoePort, PoeStatus, TdrStatus,
};
pub use normalize::{FieldKind, FieldTable, NormalizedRow, Thresholds};
pub use platform::{Vendor, VendorProfile, VendorRegistry};
pub use session::{
    CommandOptions, ConfigOptions, ConfigResponse, Outcome, Response, ResponseGroup, Session,
    SessionBuilder, SessionSettings, SessionState,
};
pub use template::{ExtractionTemplate, FragmentRegistry, TemplateResolver};
pub use transport::{
    ConfigMode, ConnectOptions, ConnectTarget, Connection, Connector, Credentials,
    HostKeyVerification, SshConnector, TransportKind,
};
