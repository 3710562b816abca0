//! Vendor profile: everything that differs between switch families.

use serde::Serialize;

use crate::transport::ConfigMode;

/// How optical alert levels are obtained from transceiver output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertSource {
    /// The device prints thresholds; readings are bucketed against them.
    Thresholds,
    /// The device prints an alert label next to each reading.
    Labels,
}

/// How optics output is collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OpticsCommand {
    /// One command covers every transceiver.
    Bulk(String),
    /// Command prefix issued once per optical interface.
    PerInterface(String),
}

/// CLI commands for one vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSet {
    pub hostname: String,
    pub running_config: String,
    pub save: String,
    pub interface_status: String,
    /// Extra descriptions merged into interface status, if listed separately.
    pub interface_description: Option<String>,
    pub media: Option<String>,
    pub optics: OpticsCommand,
    pub lldp: String,
    pub poe: String,
    /// Prefix; the interface name is appended.
    pub tdr_start: String,
    /// Prefix; the interface name is appended.
    pub tdr_show: String,
}

/// Built-in template names used for each operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSet {
    pub interface_status: String,
    pub interface_description: Option<String>,
    pub media: Option<String>,
    pub optics: String,
    pub lldp: String,
    pub poe: String,
    pub tdr: String,
}

/// Output format differences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quirks {
    pub optics_alerts: AlertSource,
    /// LLDP output is split into one block per occurrence of this term.
    pub lldp_split_term: Option<String>,
    /// Regex matched against LLDP output when LLDP is disabled.
    pub lldp_disabled_marker: Option<String>,
    /// Regex matched against TDR output while the test is still running.
    pub tdr_in_progress: String,
    /// Regex over media types that identifies pluggable optics.
    pub optical_media: String,
    /// PoE figures are printed in milliwatts rather than watts.
    pub poe_milliwatts: bool,
    /// Regex with one capture group extracting the hostname.
    pub hostname_pattern: String,
}

/// Complete per-vendor definition.
///
/// Built in code through the `with_*` methods; the built-in vendors live in
/// [`super::vendors`].
#[derive(Debug, Clone, Serialize)]
pub struct VendorProfile {
    /// Registry key and template namespace (e.g. "cisco").
    pub name: String,

    /// Device type handed to the connector (e.g. "cisco_ios").
    pub device_type: String,

    /// Prompt regex.
    pub prompt_pattern: String,

    /// Output fragments that indicate a rejected command.
    pub failed_when_contains: Vec<String>,

    /// Commands run once after connecting, before anything else.
    pub preparation_commands: Vec<String>,

    #[serde(skip)]
    pub config_mode: ConfigMode,

    pub commands: CommandSet,
    pub templates: TemplateSet,
    pub quirks: Quirks,
}

impl VendorProfile {
    pub fn new(
        name: impl Into<String>,
        device_type: impl Into<String>,
        commands: CommandSet,
        templates: TemplateSet,
        quirks: Quirks,
    ) -> Self {
        Self {
            name: name.into(),
            device_type: device_type.into(),
            prompt_pattern: crate::transport::ConnectOptions::default().prompt_pattern,
            failed_when_contains: vec![],
            preparation_commands: vec![],
            config_mode: ConfigMode::default(),
            commands,
            templates,
            quirks,
        }
    }

    /// Set the prompt regex.
    pub fn with_prompt_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.prompt_pattern = pattern.into();
        self
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Add a preparation command.
    pub fn with_preparation_command(mut self, command: impl Into<String>) -> Self {
        self.preparation_commands.push(command.into());
        self
    }

    /// Set the configuration mode commands.
    pub fn with_config_mode(mut self, enter: impl Into<String>, exit: impl Into<String>) -> Self {
        self.config_mode = ConfigMode {
            enter: enter.into(),
            exit: exit.into(),
        };
        self
    }
}
