//! Cisco IOS / IOS-XE Catalyst switches.

use crate::platform::{AlertSource, CommandSet, OpticsCommand, Quirks, TemplateSet, VendorProfile};

/// Create the Cisco profile.
pub fn profile() -> VendorProfile {
    let commands = CommandSet {
        hostname: "show running-config | include ^hostname".to_string(),
        running_config: "show running-config".to_string(),
        save: "write memory".to_string(),
        interface_status: "show interfaces status".to_string(),
        interface_description: Some("show interfaces description".to_string()),
        media: None,
        optics: OpticsCommand::Bulk("show interfaces transceiver detail".to_string()),
        lldp: "show lldp neighbors detail".to_string(),
        poe: "show power inline".to_string(),
        tdr_start: "test cable-diagnostics tdr interface".to_string(),
        tdr_show: "show cable-diagnostics tdr interface".to_string(),
    };

    let templates = TemplateSet {
        interface_status: "show_int_status".to_string(),
        interface_description: Some("show_int_desc".to_string()),
        media: None,
        optics: "show_int_trans_det".to_string(),
        lldp: "show_lldp_nei_det".to_string(),
        poe: "show_poe".to_string(),
        tdr: "show_tdr".to_string(),
    };

    let quirks = Quirks {
        optics_alerts: AlertSource::Thresholds,
        lldp_split_term: None,
        lldp_disabled_marker: Some(r"% LLDP is not enabled".to_string()),
        tdr_in_progress: r"(?i)in progress|not completed".to_string(),
        optical_media: r"(?i)sfp|fiber|optic|base-?[lsez]x|base-?[sl]r|gbic".to_string(),
        poe_milliwatts: false,
        hostname_pattern: r"(?m)^hostname\s+(\S+)".to_string(),
    };

    VendorProfile::new("cisco", "cisco_ios", commands, templates, quirks)
        .with_prompt_pattern(r"(?m)^[\w.\-@()/:]{1,63}(?:\(config[\w.\-@/:+]{0,32}\))?[>#]\s?$")
        .with_failure_pattern("% Invalid input")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Unknown command")
        .with_preparation_command("terminal length 0")
        .with_preparation_command("terminal width 511")
        .with_config_mode("configure terminal", "end")
}
