//! Brocade / Ruckus FastIron (ICX) switches.

use crate::platform::{AlertSource, CommandSet, OpticsCommand, Quirks, TemplateSet, VendorProfile};

/// Create the Brocade profile.
pub fn profile() -> VendorProfile {
    let commands = CommandSet {
        hostname: "show running-config | include hostname".to_string(),
        running_config: "show running-config".to_string(),
        save: "write memory".to_string(),
        interface_status: "show interfaces brief wide".to_string(),
        interface_description: None,
        media: Some("show media".to_string()),
        optics: OpticsCommand::PerInterface("show optic".to_string()),
        lldp: "show lldp neighbors detail".to_string(),
        poe: "show inline power".to_string(),
        tdr_start: "phy cable-diag tdr".to_string(),
        tdr_show: "show cable-diag tdr".to_string(),
    };

    let templates = TemplateSet {
        interface_status: "show_int".to_string(),
        interface_description: None,
        media: Some("show_media".to_string()),
        optics: "show_optic".to_string(),
        lldp: "show_lldp_nei_det".to_string(),
        poe: "show_poe".to_string(),
        tdr: "show_tdr".to_string(),
    };

    let quirks = Quirks {
        optics_alerts: AlertSource::Labels,
        lldp_split_term: Some("Local port".to_string()),
        lldp_disabled_marker: Some(r"\blldp\b".to_string()),
        tdr_in_progress: r"(?i)not completed|in progress".to_string(),
        optical_media: r"(?i)sfp|xfp|qsfp|fiber|optic|-[lsez]x\b|-[sl]r\b".to_string(),
        poe_milliwatts: true,
        hostname_pattern: r"(?m)^hostname\s+(\S+)".to_string(),
    };

    VendorProfile::new("brocade", "ruckus_fastiron", commands, templates, quirks)
        .with_prompt_pattern(
            r"(?m)^(?:SSH@|telnet@)?[\w.\-@()/:]{1,63}(?:\(config[\w.\-@/:+]{0,32}\))?[>#]\s?$",
        )
        .with_failure_pattern("Invalid input")
        .with_failure_pattern("Error -")
        .with_failure_pattern("Incomplete command")
        .with_preparation_command("enable")
        .with_preparation_command("skip-page-display")
        .with_config_mode("configure terminal", "end")
}
