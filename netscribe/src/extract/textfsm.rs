//! [`PatternMatcher`] backed by textfsm-rust.

use textfsm_rust::Template;

use super::{PatternMatcher, Row};
use crate::error::TemplateError;
use crate::template::ExtractionTemplate;

/// TextFSM template engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFsmMatcher;

impl TextFsmMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl PatternMatcher for TextFsmMatcher {
    fn parse(&self, template: &ExtractionTemplate, text: &str) -> Result<Vec<Row>, TemplateError> {
        let compile_error = |message: String| TemplateError::Compile {
            template: template.name.clone(),
            message,
        };

        let compiled =
            Template::parse_str(&template.resolved).map_err(|e| compile_error(e.to_string()))?;
        let mut parser = compiled.parser();
        let records = parser
            .parse_text_to_dicts(text)
            .map_err(|e| compile_error(e.to_string()))?;

        Ok(records.into_iter().map(|record| record.into_iter().collect()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ExtractOptions, extract};
    use crate::model::{
        ChassisId, InterfaceLldp, InterfaceOptics, InterfaceStatus, InterfaceTdr, LinkState,
        MediaInfo, OpticAlert, PoeStatus, TdrStatus,
    };
    use crate::normalize::{FieldTable, NormalizedRow};
    use crate::platform::AlertSource;
    use crate::template::TemplateResolver;

    fn builtin(vendor: &str, name: &str) -> ExtractionTemplate {
        TemplateResolver::default().resolve(vendor, name).unwrap()
    }

    /// Built-in template over captured device output, normalized.
    fn golden(
        vendor: &str,
        name: &str,
        sample: &str,
        options: &ExtractOptions,
    ) -> Vec<NormalizedRow> {
        let rows = extract(&TextFsmMatcher, &builtin(vendor, name), &[sample], options).unwrap();
        FieldTable::standard().normalize_all(&rows).unwrap()
    }

    #[test]
    fn test_parse_inline_template() {
        let source = "Value port (\\S+)\nValue state (up|down)\n\nStart\n  ^${port}\\s+${state}\\s*$$ -> Record\n";
        let template = TemplateResolver::default().resolve("cisco", source).unwrap();
        let rows = TextFsmMatcher
            .parse(&template, "Gi1/0/1 up\nGi1/0/2 down\n")
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["port"], "Gi1/0/1");
        assert_eq!(rows[1]["state"], "down");
    }

    #[test]
    fn test_compile_error() {
        let template = ExtractionTemplate {
            vendor: "cisco".to_string(),
            name: "broken".to_string(),
            raw: String::new(),
            resolved: "Value port\n\nStart\n  ^${nothing} -> Record\n".to_string(),
        };
        assert!(matches!(
            TextFsmMatcher.parse(&template, "x"),
            Err(TemplateError::Compile { .. })
        ));
    }

    #[test]
    fn test_cisco_interface_status() {
        let sample = include_str!("../../templates/cisco/show_int_status.txt");
        let rows = golden("cisco", "show_int_status", sample, &ExtractOptions::new());
        let statuses: Vec<InterfaceStatus> = rows
            .iter()
            .map(|row| InterfaceStatus::from_row("sw1", row).unwrap())
            .collect();
        assert_eq!(statuses.len(), 5);

        let uplink = &statuses[0];
        assert_eq!(uplink.interface, "Gi1/0/1");
        assert_eq!(uplink.description.as_deref(), Some("uplink to core"));
        assert_eq!(uplink.state, LinkState::Up);
        assert_eq!(uplink.vlan.as_deref(), Some("trunk"));
        assert_eq!(uplink.speed_mbps, Some(1000));
        assert_eq!(uplink.duplex.as_deref(), Some("full"));

        let idle = &statuses[1];
        assert_eq!(idle.description, None);
        assert_eq!(idle.state, LinkState::Down);
        assert_eq!(idle.speed_mbps, None);

        assert_eq!(statuses[2].state, LinkState::Disabled);
        assert_eq!(statuses[3].media.as_deref(), Some("Not Present"));
        assert_eq!(statuses[4].speed_mbps, Some(10000));
        assert_eq!(statuses[4].media.as_deref(), Some("SFP-10GBase-SR"));
    }

    #[test]
    fn test_cisco_interface_description() {
        let sample = include_str!("../../templates/cisco/show_int_desc.txt");
        let rows = golden("cisco", "show_int_desc", sample, &ExtractOptions::new());
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].text("interface").as_deref(), Some("Vl1"));
        assert_eq!(rows[0].text("description"), None);
        assert_eq!(rows[1].text("description").as_deref(), Some("uplink to core"));
        assert_eq!(rows[2].text("description"), None);
        assert_eq!(rows[3].text("interface").as_deref(), Some("Gi1/0/3"));
        assert_eq!(rows[3].text("description").as_deref(), Some("printer"));
    }

    #[test]
    fn test_cisco_transceiver_detail() {
        let sample = include_str!("../../templates/cisco/show_int_trans_det.txt");
        let options = ExtractOptions::new().flatten_key("interface");
        let rows = golden("cisco", "show_int_trans_det", sample, &options);
        assert_eq!(rows.len(), 2);

        let healthy = InterfaceOptics::from_row("sw1", &rows[0], AlertSource::Thresholds).unwrap();
        assert_eq!(healthy.interface, "Te1/1/1");
        assert_eq!(healthy.temperature.map(|r| r.value), Some(32.5));
        assert_eq!(healthy.voltage.map(|r| r.value), Some(3.29));
        assert_eq!(healthy.current.map(|r| r.value), Some(6.4));
        assert_eq!(healthy.tx_power.map(|r| r.value), Some(-2.4));
        assert_eq!(healthy.rx_power.and_then(|r| r.alert), Some(OpticAlert::Normal));
        assert!(healthy.alerts().is_empty());

        let dark = InterfaceOptics::from_row("sw1", &rows[1], AlertSource::Thresholds).unwrap();
        assert_eq!(dark.interface, "Te1/1/2");
        assert_eq!(dark.alerts(), vec![("rx_power", OpticAlert::LowAlarm)]);
    }

    #[test]
    fn test_cisco_lldp_detail() {
        let sample = include_str!("../../templates/cisco/show_lldp_nei_det.txt");
        let rows = golden("cisco", "show_lldp_nei_det", sample, &ExtractOptions::new());
        assert_eq!(rows.len(), 2);

        let core = InterfaceLldp::from_row("sw1", &rows[0]).unwrap();
        assert_eq!(core.interface, "Gi1/0/48");
        assert_eq!(
            core.chassis_id.as_ref().and_then(ChassisId::mac).map(|mac| mac.to_string()),
            Some("00:24:38:aa:bb:01".to_string())
        );
        assert_eq!(core.port_id.as_deref(), Some("Gi0/1"));
        assert_eq!(core.system_name.as_deref(), Some("core-1"));
        assert!(core
            .system_description
            .as_deref()
            .is_some_and(|d| d.starts_with("Cisco IOS Software, C2960X")));
        assert_eq!(core.management_ipv4, Some("10.1.1.1".parse().unwrap()));
        assert_eq!(core.port_vlan, Some(1));

        let phone = InterfaceLldp::from_row("sw1", &rows[1]).unwrap();
        assert_eq!(phone.interface, "Gi1/0/12");
        assert_eq!(
            phone.chassis_id,
            Some(ChassisId::Other("0011.22ff.fe33.4455".to_string()))
        );
        assert_eq!(phone.system_name, None);
        assert_eq!(phone.port_vlan, None);
        assert_eq!(
            phone.management_ipv6,
            Some("fe80::211:22ff:fe33:4455".parse().unwrap())
        );
    }

    #[test]
    fn test_cisco_poe() {
        let sample = include_str!("../../templates/cisco/show_poe.txt");
        let rows = golden("cisco", "show_poe", sample, &ExtractOptions::new());
        let poe = PoeStatus::from_rows("sw1", &rows, false).unwrap();

        assert_eq!(poe.host.capacity_w, Some(740.0));
        assert_eq!(poe.host.consumed_w, Some(21.4));
        assert_eq!(poe.host.available_w, Some(718.6));
        assert_eq!(poe.ports.len(), 3);

        let phone = &poe.ports["Gi1/0/1"];
        assert_eq!(phone.device.as_deref(), Some("IP Phone 8841"));
        assert_eq!(phone.consumed_w, Some(6.4));
        assert_eq!(phone.allocated_w, Some(30.0));
        assert_eq!(poe.ports["Gi1/0/2"].device, None);
        assert_eq!(poe.ports["Gi1/0/3"].power_class.as_deref(), Some("4"));
    }

    #[test]
    fn test_cisco_tdr_has_no_trailing_partial_row() {
        let sample = include_str!("../../templates/cisco/show_tdr.txt");
        let raw = TextFsmMatcher.parse(&builtin("cisco", "show_tdr"), sample).unwrap();
        assert_eq!(raw.len(), 4);
        assert!(raw.iter().all(|row| !row["local_pair"].is_empty()));

        let rows = FieldTable::standard().normalize_all(&raw).unwrap();
        let tdr = InterfaceTdr::from_rows("sw1", "Gi1/0/1", &rows).unwrap();
        assert_eq!(tdr.speed_mbps, Some(1000));
        let pair_a = tdr.pair_a.as_ref().unwrap();
        assert_eq!(pair_a.status, TdrStatus::Normal);
        assert_eq!(pair_a.remote_pair.as_deref(), Some("A"));
        assert_eq!(pair_a.distance_m, None);
        let pair_c = tdr.pair_c.as_ref().unwrap();
        assert_eq!(pair_c.status, TdrStatus::Open);
        assert_eq!(pair_c.distance_m, Some(23));
        assert!(tdr.pair_d.is_some());
        assert!(tdr.has_fault());
    }

    #[test]
    fn test_brocade_interface_brief() {
        let sample = include_str!("../../templates/brocade/show_int.txt");
        let rows = golden("brocade", "show_int", sample, &ExtractOptions::new());
        let statuses: Vec<InterfaceStatus> = rows
            .iter()
            .map(|row| InterfaceStatus::from_row("icx1", row).unwrap())
            .collect();
        assert_eq!(statuses.len(), 4);

        let uplink = &statuses[0];
        assert_eq!(uplink.interface, "1/1/1");
        assert_eq!(uplink.state, LinkState::Up);
        assert_eq!(uplink.speed_mbps, Some(1000));
        assert_eq!(uplink.tagged, Some(false));
        assert_eq!(uplink.pvid, Some(1));
        assert_eq!(uplink.description.as_deref(), Some("uplink to core"));
        assert_eq!(uplink.media.as_deref(), Some("copper"));
        assert_eq!(
            uplink.mac.map(|mac| mac.to_string()),
            Some("cc:4e:24:6d:a1:c0".to_string())
        );

        let down = &statuses[1];
        assert_eq!(down.state, LinkState::Down);
        assert_eq!(down.speed_mbps, None);
        assert_eq!(down.duplex, None);
        assert_eq!(down.description, None);
        assert_eq!(down.pvid, Some(20));

        assert_eq!(statuses[2].tagged, Some(true));
        assert_eq!(statuses[2].pvid, None);
        assert_eq!(statuses[2].speed_mbps, Some(10000));
        assert_eq!(statuses[3].interface, "mgmt1");
    }

    #[test]
    fn test_brocade_media() {
        let sample = include_str!("../../templates/brocade/show_media.txt");
        let rows = golden("brocade", "show_media", sample, &ExtractOptions::new());
        let media: Vec<MediaInfo> = rows
            .iter()
            .map(|row| MediaInfo::from_row("icx1", row).unwrap())
            .collect();
        assert_eq!(media.len(), 3);
        assert_eq!(media[0].media_type.as_deref(), Some("1G M-C (Gig-Copper)"));
        assert_eq!(media[0].vendor, None);

        let sfp = &media[1];
        assert_eq!(sfp.interface, "1/2/1");
        assert_eq!(sfp.media_type.as_deref(), Some("10GE SR 300m (SFP +)"));
        assert_eq!(sfp.vendor.as_deref(), Some("BROCADE-RUCKUS"));
        assert_eq!(sfp.part_number.as_deref(), Some("57-0000075-01"));
        assert_eq!(sfp.serial.as_deref(), Some("CCW1234567"));

        assert_eq!(media[2].media_type.as_deref(), Some("EMPTY"));
    }

    #[test]
    fn test_brocade_optic() {
        let sample = include_str!("../../templates/brocade/show_optic.txt");
        let rows = golden("brocade", "show_optic", sample, &ExtractOptions::new());
        assert_eq!(rows.len(), 1);

        let optics = InterfaceOptics::from_row("icx1", &rows[0], AlertSource::Labels).unwrap();
        assert_eq!(optics.interface, "1/2/1");
        assert_eq!(optics.temperature.map(|r| r.value), Some(31.8437));
        assert_eq!(optics.tx_power.map(|r| r.value), Some(-2.5157));
        assert_eq!(optics.current.map(|r| r.value), Some(5.898));
        assert_eq!(optics.voltage, None);
        assert_eq!(optics.alerts(), vec![("rx_power", OpticAlert::LowWarn)]);
    }

    #[test]
    fn test_brocade_lldp_detail() {
        let sample = include_str!("../../templates/brocade/show_lldp_nei_det.txt");
        let options = ExtractOptions::new().split_term("Local port");
        let rows = golden("brocade", "show_lldp_nei_det", sample, &options);
        assert_eq!(rows.len(), 1);

        let neighbor = InterfaceLldp::from_row("icx1", &rows[0]).unwrap();
        assert_eq!(neighbor.interface, "1/1/1");
        assert_eq!(
            neighbor.chassis_id.map(|id| id.to_string()),
            Some("00:24:38:aa:bb:01".to_string())
        );
        assert_eq!(neighbor.port_id.as_deref(), Some("GigabitEthernet0/1"));
        assert_eq!(neighbor.port_description.as_deref(), Some("GigabitEthernet0/1"));
        assert_eq!(neighbor.system_name.as_deref(), Some("core-1"));
        assert_eq!(
            neighbor.system_description.as_deref(),
            Some("Cisco IOS Software, C2960X Software, Version 15.2(7)E4")
        );
        assert_eq!(neighbor.management_ipv4, Some("10.1.1.1".parse().unwrap()));
        assert_eq!(neighbor.port_vlan, Some(1));
    }

    #[test]
    fn test_brocade_poe() {
        let sample = include_str!("../../templates/brocade/show_poe.txt");
        let rows = golden("brocade", "show_poe", sample, &ExtractOptions::new());
        let poe = PoeStatus::from_rows("icx1", &rows, true).unwrap();

        assert_eq!(poe.host.capacity_w, Some(740.0));
        assert_eq!(poe.host.available_w, Some(715.4));
        assert!(poe.host.consumed_w.is_some_and(|w| (w - 24.6).abs() < 1e-9));
        assert_eq!(poe.ports.len(), 2);

        let ap = &poe.ports["1/1/1"];
        assert_eq!(ap.consumed_w, Some(5.4));
        assert_eq!(ap.allocated_w, Some(6.2));
        assert_eq!(ap.device.as_deref(), Some("802.3at"));
        assert_eq!(ap.power_class.as_deref(), Some("Class 4"));
        assert_eq!(ap.priority.as_deref(), Some("3"));
        assert_eq!(ap.error, None);
        assert_eq!(poe.ports["1/1/2"].oper_state.as_deref(), Some("Off"));
    }

    #[test]
    fn test_brocade_tdr_bounded_distance() {
        let sample = include_str!("../../templates/brocade/show_tdr.txt");
        let raw = TextFsmMatcher.parse(&builtin("brocade", "show_tdr"), sample).unwrap();
        assert_eq!(raw.len(), 4);
        assert_eq!(raw[0]["distance_bound"], "<");
        assert_eq!(raw[3]["distance_bound"], "");

        let rows = FieldTable::standard().normalize_all(&raw).unwrap();
        let tdr = InterfaceTdr::from_rows("icx1", "1/1/1", &rows).unwrap();
        assert_eq!(tdr.speed_mbps, Some(1000));
        assert_eq!(tdr.pair_a.as_ref().unwrap().status, TdrStatus::Normal);
        assert_eq!(tdr.pair_a.as_ref().unwrap().remote_pair.as_deref(), Some("B"));

        let open = tdr.pair_c.as_ref().unwrap();
        assert_eq!(open.status, TdrStatus::Open);
        assert_eq!(open.distance_m, None);

        let short = tdr.pair_d.as_ref().unwrap();
        assert_eq!(short.status, TdrStatus::Short);
        assert_eq!(short.distance_m, Some(12));
    }
}
