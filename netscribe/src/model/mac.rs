//! MAC address value type.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// EUI-48 MAC address.
///
/// Parses colon, dash, dot or space separated forms as well as bare hex,
/// and always displays as lowercase colon-separated (`aa:bb:cc:dd:ee:ff`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Organizationally unique identifier (first three octets).
    pub fn oui(&self) -> [u8; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }
}

impl FromStr for MacAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::Mac(s.to_string());

        let hex: Vec<u8> = s
            .trim()
            .bytes()
            .filter(|b| !matches!(b, b':' | b'-' | b'.' | b' '))
            .collect();

        if hex.len() != 12 || !hex.iter().all(u8::is_ascii_hexdigit) {
            return Err(invalid());
        }

        let mut octets = [0u8; 6];
        for (octet, pair) in octets.iter_mut().zip(hex.chunks(2)) {
            let pair = std::str::from_utf8(pair).map_err(|_| invalid())?;
            *octet = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_formats() {
        let expected = "00:11:22:aa:bb:cc";
        for raw in [
            "00:11:22:AA:BB:CC",
            "00-11-22-aa-bb-cc",
            "0011.22aa.bbcc",
            "001122aabbcc",
            "00 11 22 aa bb cc",
        ] {
            let mac: MacAddress = raw.parse().unwrap();
            assert_eq!(mac.to_string(), expected, "input {raw}");
        }
    }

    #[test]
    fn test_rejects_invalid() {
        assert_eq!(
            "0011.22aa.bbc".parse::<MacAddress>(),
            Err(ValidationError::Mac("0011.22aa.bbc".to_string()))
        );
        assert!("zz11.22aa.bbcc".parse::<MacAddress>().is_err());
        assert!("switch2.example.com".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_rejects_signed_octets() {
        assert_eq!(
            "+1+2+3+4+5+6".parse::<MacAddress>(),
            Err(ValidationError::Mac("+1+2+3+4+5+6".to_string()))
        );
        assert!("+0:11:22:33:44:55".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_oui() {
        let mac: MacAddress = "cc4e.246d.a1c0".parse().unwrap();
        assert_eq!(mac.oui(), [0xcc, 0x4e, 0x24]);
    }
}
