use std::fmt;

use serde::Serialize;

use crate::error::ValidationError;
use crate::normalize::NormalizedRow;

/// Operational link state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    Up,
    Down,
    Disabled,
    ErrDisabled,
    /// Any other vendor state, kept verbatim.
    Other(String),
}

impl LinkState {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "connected" | "up" => LinkState::Up,
            "notconnect" | "down" => LinkState::Down,
            "disabled" | "disable" => LinkState::Disabled,
            "err-disabled" | "err-dis" => LinkState::ErrDisabled,
            _ => LinkState::Other(raw.trim().to_string()),
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, LinkState::Up)
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkState::Up => f.write_str("up"),
            LinkState::Down => f.write_str("down"),
            LinkState::Disabled => f.write_str("disabled"),
            LinkState::ErrDisabled => f.write_str("err-disabled"),
            LinkState::Other(state) => f.write_str(state),
        }
    }
}

/// Status of one interface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceStatus {
    pub host: String,
    pub interface: String,
    pub description: Option<String>,
    pub state: LinkState,
    pub vlan: Option<String>,
    pub speed_mbps: Option<u32>,
    pub duplex: Option<String>,
    pub media: Option<String>,
    pub mac: Option<crate::model::MacAddress>,
    pub tagged: Option<bool>,
    pub pvid: Option<u16>,
    pub priority: Option<String>,
    pub trunk: Option<String>,
}

impl InterfaceStatus {
    pub fn from_row(host: &str, row: &NormalizedRow) -> Result<Self, ValidationError> {
        let state = row
            .text("state")
            .map(|s| LinkState::parse(&s))
            .ok_or_else(|| ValidationError::MissingField("state".to_string()))?;

        Ok(Self {
            host: host.to_string(),
            interface: row.require_text("interface")?,
            description: row.text("description"),
            state,
            vlan: row.text("vlan"),
            speed_mbps: row.speed("speed"),
            duplex: row.text("duplex").map(|d| d.to_ascii_lowercase()),
            media: row.text("media"),
            mac: row.mac("mac"),
            tagged: row.flag("tag"),
            pvid: row.u16("pvid")?,
            priority: row.text("priority"),
            trunk: row.text("trunk"),
        })
    }
}

/// Transceiver / port media details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaInfo {
    pub host: String,
    pub interface: String,
    pub media_type: Option<String>,
    pub vendor: Option<String>,
    pub part_number: Option<String>,
    pub serial: Option<String>,
}

impl MediaInfo {
    pub fn from_row(host: &str, row: &NormalizedRow) -> Result<Self, ValidationError> {
        Ok(Self {
            host: host.to_string(),
            interface: row.require_text("interface")?,
            media_type: row.text("media_type"),
            vendor: row.text("vendor"),
            part_number: row.text("part_number"),
            serial: row.text("serial"),
        })
    }
}
