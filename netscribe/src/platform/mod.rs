//! Vendor capability table.
//!
//! Every behavioral difference between switch families is data in a
//! [`VendorProfile`]: command strings, template names, prompt and failure
//! patterns, preparation commands and output quirks.

mod definition;
mod registry;
pub mod vendors;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use definition::{AlertSource, CommandSet, OpticsCommand, Quirks, TemplateSet, VendorProfile};
pub use registry::VendorRegistry;

use crate::error::SessionError;

/// Built-in switch families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Cisco,
    /// Brocade / Ruckus FastIron.
    Brocade,
}

impl Vendor {
    /// Registry key and template namespace.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Cisco => "cisco",
            Vendor::Brocade => "brocade",
        }
    }

    /// Built-in profile for this vendor.
    pub fn profile(&self) -> VendorProfile {
        match self {
            Vendor::Cisco => vendors::cisco::profile(),
            Vendor::Brocade => vendors::brocade::profile(),
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cisco" | "cisco_ios" => Ok(Vendor::Cisco),
            "brocade" | "ruckus" | "ruckus_fastiron" => Ok(Vendor::Brocade),
            _ => Err(SessionError::UnknownVendor {
                name: s.to_string(),
            }),
        }
    }
}
