use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use serde::Serialize;

use super::MacAddress;
use crate::error::ValidationError;
use crate::normalize::{FieldValue, NormalizedRow};

/// Neighbor chassis identifier.
///
/// Most switches advertise an EUI-48 base MAC; anything else (EUI-64,
/// locally assigned names) is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChassisId {
    Mac(MacAddress),
    Other(String),
}

impl ChassisId {
    pub fn mac(&self) -> Option<MacAddress> {
        match self {
            ChassisId::Mac(mac) => Some(*mac),
            ChassisId::Other(_) => None,
        }
    }

    fn from_row(row: &NormalizedRow, field: &str) -> Option<Self> {
        match row.get(field)? {
            FieldValue::Mac(mac) => Some(ChassisId::Mac(*mac)),
            FieldValue::Text(text) => Some(ChassisId::Other(text.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ChassisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChassisId::Mac(mac) => write!(f, "{mac}"),
            ChassisId::Other(text) => f.write_str(text),
        }
    }
}

/// LLDP neighbor seen on one interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceLldp {
    pub host: String,
    pub interface: String,
    pub chassis_id: Option<ChassisId>,
    pub port_id: Option<String>,
    pub port_description: Option<String>,
    pub system_name: Option<String>,
    pub system_description: Option<String>,
    pub port_vlan: Option<u16>,
    pub management_ipv4: Option<Ipv4Addr>,
    pub management_ipv6: Option<Ipv6Addr>,
}

impl InterfaceLldp {
    pub fn from_row(host: &str, row: &NormalizedRow) -> Result<Self, ValidationError> {
        Ok(Self {
            host: host.to_string(),
            interface: row.require_text("interface")?,
            chassis_id: ChassisId::from_row(row, "chassis_id"),
            port_id: row.text("port_id"),
            port_description: row.text("port_description"),
            system_name: row.text("system_name"),
            system_description: row.text("system_description"),
            port_vlan: row.u16("port_vlan")?,
            management_ipv4: row.ipv4("management_ipv4"),
            management_ipv6: row.ipv6("management_ipv6"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Row;
    use crate::normalize::FieldTable;

    fn normalized(pairs: &[(&str, &str)]) -> NormalizedRow {
        let row: Row = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        FieldTable::standard().normalize(&row).unwrap()
    }

    #[test]
    fn test_eui48_chassis_id() {
        let row = normalized(&[("interface", "Gi1/0/1"), ("chassis_id", "0024.38aa.bb01")]);
        let lldp = InterfaceLldp::from_row("sw1", &row).unwrap();
        let chassis = lldp.chassis_id.unwrap();
        assert_eq!(chassis.to_string(), "00:24:38:aa:bb:01");
        assert!(chassis.mac().is_some());
    }

    #[test]
    fn test_eui64_chassis_id_is_kept_as_text() {
        let row = normalized(&[
            ("interface", "Gi1/0/2"),
            ("chassis_id", "00:11:22:ff:fe:33:44:55"),
            ("system_name", "ap-lobby"),
        ]);
        let lldp = InterfaceLldp::from_row("sw1", &row).unwrap();
        assert_eq!(
            lldp.chassis_id,
            Some(ChassisId::Other("00:11:22:ff:fe:33:44:55".to_string()))
        );
        assert_eq!(lldp.system_name.as_deref(), Some("ap-lobby"));
    }
}
