//! Named regex fragments substituted into template `Value` lines.

use std::collections::HashMap;

const HEX_PATTERN: &str = r"[a-fA-F0-9]";
const IPV4_OCTET: &str = r"(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)";
const BINARY_OCTET: &str = r"(?:0|128|192|224|240|248|252|254|255)";
const BASIC_IPV6: &str = r"(?:[a-fA-F\d]{0,4}:?){0,7}(?:[a-fA-F\d]{0,4}:?)";

/// Registry of `#NAME#` placeholders.
///
/// Fragments use non-capturing groups only, so they can be embedded in a
/// single `Value` capture.
#[derive(Debug, Clone, Default)]
pub struct FragmentRegistry {
    fragments: HashMap<String, String>,
}

impl FragmentRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the hex, MAC, IP and interface fragments.
    pub fn builtin() -> Self {
        let hex_pair = format!("{HEX_PATTERN}{{2}}");
        let mac_portion = format!(r"{hex_pair}[:\-\. ]?");
        let eui48 = format!("(?:{mac_portion}){{5}}{hex_pair}");
        let eui64 = format!("(?:{mac_portion}){{7}}{hex_pair}");
        let ipv4 = format!(r"(?:{IPV4_OCTET}\.){{3}}{IPV4_OCTET}");
        let mixed_ipv6 = format!("::(?:[fF]{{4}}:)?{ipv4}");
        let ipv6 = format!("{BASIC_IPV6}|{mixed_ipv6}");

        let mut registry = Self::new();
        registry.register("HEX_PATTERN", HEX_PATTERN);
        registry.register("HEX_PAIR", hex_pair.clone());
        registry.register("MAC_PORTION", mac_portion);
        registry.register("EUI48_PATTERN", eui48.clone());
        registry.register("EUI64_PATTERN", eui64.clone());
        registry.register("MAC_PATTERN", format!("{eui48}|{eui64}"));
        registry.register("IPV4_OCTET", IPV4_OCTET);
        registry.register("IPV4_PATTERN", ipv4.clone());
        registry.register(
            "IPV4_SUBNET_MASK",
            format!(r"(?:{BINARY_OCTET}\.){{3}}{BINARY_OCTET}"),
        );
        registry.register("BASIC_IPV6", BASIC_IPV6);
        registry.register("MIXED_IPV6", mixed_ipv6);
        registry.register("IPV6_PATTERN", ipv6.clone());
        registry.register("IP_PATTERN", format!("{ipv4}|{ipv6}"));
        registry.register("INTERFACE_REGEX", r"(?:\w+)?\d/\d/\d+");
        registry.register("INTERFACE_ABBREV", r"(?:(?:SFP\+?|[Pp]ort)\s?\d+?\s(?:o[fn])?\s)");
        registry
    }

    /// Add or replace a fragment.
    pub fn register(&mut self, name: impl Into<String>, pattern: impl Into<String>) -> &mut Self {
        self.fragments.insert(name.into(), pattern.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fragments.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }
}
