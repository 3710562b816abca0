//! Field normalization.
//!
//! Every raw matcher value passes through one table, [`FieldTable`], which
//! maps a field name to a [`FieldKind`]. Sentinel strings (`N/A`, `None`,
//! `not advertised`, `--`, blank) become absent values for every kind, so
//! records never carry placeholder text.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;

use crate::error::ValidationError;
use crate::extract::Row;
use crate::model::{MacAddress, OpticAlert, TdrStatus};

/// Parameters reported by transceiver diagnostics.
pub const OPTIC_PARAMETERS: [&str; 5] = ["temperature", "voltage", "current", "tx_power", "rx_power"];

/// Threshold suffixes paired with each optic parameter.
pub const THRESHOLD_SUFFIXES: [&str; 4] = ["low_alarm", "low_warn", "high_warn", "high_alarm"];

const SENTINELS: [&str; 4] = ["n/a", "na", "none", "not advertised"];

/// How a field's raw text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Link speed in Mbps.
    Speed,
    Integer,
    Float,
    Mac,
    /// EUI-48 MAC when it parses as one, text otherwise.
    MacOrText,
    Ipv4,
    Ipv6,
    /// Optical alert label.
    Alert,
    TdrStatus,
    /// Yes/no.
    Flag,
}

/// A normalized value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Mac(MacAddress),
    Ip(IpAddr),
    Alert(OpticAlert),
    Tdr(TdrStatus),
    Flag(bool),
}

/// A row after normalization. Absent values are simply not stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedRow {
    values: HashMap<String, FieldValue>,
}

impl NormalizedRow {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.values.insert(field.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn text(&self, field: &str) -> Option<String> {
        match self.values.get(field) {
            Some(FieldValue::Text(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Text that must be present.
    pub fn require_text(&self, field: &str) -> Result<String, ValidationError> {
        self.text(field)
            .ok_or_else(|| ValidationError::MissingField(field.to_string()))
    }

    pub fn integer(&self, field: &str) -> Option<i64> {
        match self.values.get(field) {
            Some(FieldValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    /// Integer narrowed to `u16` (VLAN ids, distances).
    pub fn u16(&self, field: &str) -> Result<Option<u16>, ValidationError> {
        self.integer(field)
            .map(|value| {
                u16::try_from(value).map_err(|_| ValidationError::Number {
                    field: field.to_string(),
                    value: value.to_string(),
                })
            })
            .transpose()
    }

    pub fn float(&self, field: &str) -> Option<f64> {
        match self.values.get(field) {
            Some(FieldValue::Float(value)) => Some(*value),
            Some(FieldValue::Integer(value)) => Some(*value as f64),
            _ => None,
        }
    }

    /// Speed in Mbps.
    pub fn speed(&self, field: &str) -> Option<u32> {
        self.integer(field).and_then(|value| u32::try_from(value).ok())
    }

    pub fn mac(&self, field: &str) -> Option<MacAddress> {
        match self.values.get(field) {
            Some(FieldValue::Mac(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn ipv4(&self, field: &str) -> Option<Ipv4Addr> {
        match self.values.get(field) {
            Some(FieldValue::Ip(IpAddr::V4(value))) => Some(*value),
            _ => None,
        }
    }

    pub fn ipv6(&self, field: &str) -> Option<Ipv6Addr> {
        match self.values.get(field) {
            Some(FieldValue::Ip(IpAddr::V6(value))) => Some(*value),
            _ => None,
        }
    }

    pub fn alert(&self, field: &str) -> Option<OpticAlert> {
        match self.values.get(field) {
            Some(FieldValue::Alert(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn tdr_status(&self, field: &str) -> Option<TdrStatus> {
        match self.values.get(field) {
            Some(FieldValue::Tdr(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn flag(&self, field: &str) -> Option<bool> {
        match self.values.get(field) {
            Some(FieldValue::Flag(value)) => Some(*value),
            _ => None,
        }
    }
}

/// Field name to kind mapping shared by every vendor and record.
///
/// Unknown fields are treated as [`FieldKind::Text`].
#[derive(Debug, Clone)]
pub struct FieldTable {
    kinds: HashMap<String, FieldKind>,
}

impl Default for FieldTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl FieldTable {
    /// Table covering every field produced by the built-in templates.
    pub fn standard() -> Self {
        let mut table = Self {
            kinds: HashMap::new(),
        };

        table = table
            .with_field("speed", FieldKind::Speed)
            .with_field("pvid", FieldKind::Integer)
            .with_field("port_vlan", FieldKind::Integer)
            .with_field("distance", FieldKind::Integer)
            .with_field("mac", FieldKind::Mac)
            .with_field("chassis_id", FieldKind::MacOrText)
            .with_field("management_ipv4", FieldKind::Ipv4)
            .with_field("management_ipv6", FieldKind::Ipv6)
            .with_field("pair_status", FieldKind::TdrStatus)
            .with_field("tag", FieldKind::Flag);

        for field in [
            "consumed",
            "allocated",
            "total_capacity",
            "total_consumed",
            "total_available",
        ] {
            table = table.with_field(field, FieldKind::Float);
        }

        for parameter in OPTIC_PARAMETERS {
            table = table
                .with_field(parameter, FieldKind::Float)
                .with_field(format!("{parameter}_alert"), FieldKind::Alert);
            for suffix in THRESHOLD_SUFFIXES {
                table = table.with_field(format!("{parameter}_{suffix}"), FieldKind::Float);
            }
        }

        table
    }

    /// Add or override a field.
    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.kinds.insert(name.into(), kind);
        self
    }

    pub fn kind(&self, field: &str) -> FieldKind {
        self.kinds.get(field).copied().unwrap_or(FieldKind::Text)
    }

    /// Normalize every field of `row`. The first invalid value aborts.
    pub fn normalize(&self, row: &Row) -> Result<NormalizedRow, ValidationError> {
        let mut normalized = NormalizedRow::default();
        for (field, raw) in row {
            if let Some(value) = normalize_value(field, self.kind(field), raw)? {
                normalized.insert(field.clone(), value);
            }
        }
        Ok(normalized)
    }

    /// Normalize a batch of rows, failing on the first invalid value.
    pub fn normalize_all(&self, rows: &[Row]) -> Result<Vec<NormalizedRow>, ValidationError> {
        rows.iter().map(|row| self.normalize(row)).collect()
    }
}

/// Whether `raw` is a placeholder for "no value".
pub fn is_sentinel(raw: &str) -> bool {
    let value = raw.trim().trim_start_matches('-').trim();
    value.is_empty() || SENTINELS.iter().any(|s| value.eq_ignore_ascii_case(s))
}

/// Normalize one raw value. `Ok(None)` means absent.
pub fn normalize_value(
    field: &str,
    kind: FieldKind,
    raw: &str,
) -> Result<Option<FieldValue>, ValidationError> {
    if is_sentinel(raw) {
        return Ok(None);
    }
    let value = raw.trim();

    let normalized = match kind {
        FieldKind::Text => FieldValue::Text(value.to_string()),
        FieldKind::Speed => match normalize_speed(value)? {
            Some(mbps) => FieldValue::Integer(i64::from(mbps)),
            None => return Ok(None),
        },
        FieldKind::Integer => FieldValue::Integer(value.parse().map_err(|_| number(field, value))?),
        FieldKind::Float => FieldValue::Float(value.parse().map_err(|_| number(field, value))?),
        FieldKind::Mac => FieldValue::Mac(value.parse()?),
        FieldKind::MacOrText => value
            .parse()
            .map(FieldValue::Mac)
            .unwrap_or_else(|_| FieldValue::Text(value.to_string())),
        FieldKind::Ipv4 => FieldValue::Ip(IpAddr::V4(value.parse().map_err(|_| ip(field, value))?)),
        FieldKind::Ipv6 => FieldValue::Ip(IpAddr::V6(value.parse().map_err(|_| ip(field, value))?)),
        FieldKind::Alert => FieldValue::Alert(value.parse()?),
        FieldKind::TdrStatus => FieldValue::Tdr(value.parse()?),
        FieldKind::Flag => FieldValue::Flag(normalize_flag(field, value)?),
    };
    Ok(Some(normalized))
}

/// Canonical link speed in Mbps.
///
/// `100M` → 100, `1G` → 1000, a bare integer passes through, `auto` and
/// sentinels are absent. A leading `a-` (auto-negotiated) is ignored.
pub fn normalize_speed(raw: &str) -> Result<Option<u32>, ValidationError> {
    let trimmed = raw.trim();
    let value = trimmed
        .strip_prefix("a-")
        .or_else(|| trimmed.strip_prefix("A-"))
        .unwrap_or(trimmed);

    if is_sentinel(value) || value.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }

    if let Ok(mbps) = value.parse::<u32>() {
        return Ok(Some(mbps));
    }

    let invalid = || ValidationError::Speed(raw.to_string());
    let mut chars = value.chars();
    let multiplier = match chars.next_back() {
        Some('M' | 'm') => 1,
        Some('G' | 'g') => 1000,
        _ => return Err(invalid()),
    };
    let magnitude: u32 = chars.as_str().parse().map_err(|_| invalid())?;
    magnitude
        .checked_mul(multiplier)
        .map(Some)
        .ok_or_else(invalid)
}

fn normalize_flag(field: &str, value: &str) -> Result<bool, ValidationError> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "on" | "enabled" => Ok(true),
        "no" | "n" | "false" | "off" | "disabled" => Ok(false),
        _ => Err(ValidationError::Flag {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

fn number(field: &str, value: &str) -> ValidationError {
    ValidationError::Number {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn ip(field: &str, value: &str) -> ValidationError {
    ValidationError::Ip {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Alarm and warning limits for one optic parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub low_alarm: f64,
    pub low_warn: f64,
    pub high_warn: f64,
    pub high_alarm: f64,
}

impl Thresholds {
    /// Limits must be ordered `low_alarm <= low_warn <= high_warn <= high_alarm`.
    pub fn new(
        parameter: &str,
        low_alarm: f64,
        low_warn: f64,
        high_warn: f64,
        high_alarm: f64,
    ) -> Result<Self, ValidationError> {
        if !(low_alarm <= low_warn && low_warn <= high_warn && high_warn <= high_alarm) {
            return Err(ValidationError::Thresholds(parameter.to_string()));
        }
        Ok(Self {
            low_alarm,
            low_warn,
            high_warn,
            high_alarm,
        })
    }

    /// Read `<parameter>_<suffix>` limits from a row.
    ///
    /// `Ok(None)` when any limit is absent.
    pub fn from_row(row: &NormalizedRow, parameter: &str) -> Result<Option<Self>, ValidationError> {
        let limit = |suffix: &str| row.float(&format!("{parameter}_{suffix}"));
        match (
            limit("low_alarm"),
            limit("low_warn"),
            limit("high_warn"),
            limit("high_alarm"),
        ) {
            (Some(la), Some(lw), Some(hw), Some(ha)) => Self::new(parameter, la, lw, hw, ha).map(Some),
            _ => Ok(None),
        }
    }

    /// Bucket a reading into half-open bands; the alarm bands extend to
    /// ±∞. `None` for NaN.
    pub fn classify(&self, reading: f64) -> Option<OpticAlert> {
        let bands = [
            (f64::NEG_INFINITY, self.low_alarm, OpticAlert::LowAlarm),
            (self.low_alarm, self.low_warn, OpticAlert::LowWarn),
            (self.low_warn, self.high_warn, OpticAlert::Normal),
            (self.high_warn, self.high_alarm, OpticAlert::HighWarn),
            (self.high_alarm, f64::INFINITY, OpticAlert::HighAlarm),
        ];
        bands
            .iter()
            .find(|(low, high, _)| *low <= reading && reading < *high)
            .map(|(_, _, alert)| *alert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_speed() {
        assert_eq!(normalize_speed("100M"), Ok(Some(100)));
        assert_eq!(normalize_speed("1G"), Ok(Some(1000)));
        assert_eq!(normalize_speed("10g"), Ok(Some(10000)));
        assert_eq!(normalize_speed("a-1000"), Ok(Some(1000)));
        assert_eq!(normalize_speed("1000"), Ok(Some(1000)));
        assert_eq!(normalize_speed("auto"), Ok(None));
        assert_eq!(normalize_speed("None"), Ok(None));
        assert_eq!(
            normalize_speed("fast"),
            Err(ValidationError::Speed("fast".to_string()))
        );
        assert!(normalize_speed("M").is_err());
    }

    #[test]
    fn test_sentinels_are_absent_for_every_kind() {
        let kinds = [
            FieldKind::Text,
            FieldKind::Speed,
            FieldKind::Integer,
            FieldKind::Float,
            FieldKind::Mac,
            FieldKind::MacOrText,
            FieldKind::Ipv4,
            FieldKind::Ipv6,
            FieldKind::Alert,
            FieldKind::TdrStatus,
            FieldKind::Flag,
        ];
        for raw in ["N/A", "na", "None", "not advertised", "- not advertised", "--", "", "  "] {
            for kind in kinds {
                assert_eq!(normalize_value("f", kind, raw), Ok(None), "{raw:?} as {kind:?}");
            }
        }
    }

    #[test]
    fn test_negative_numbers_are_not_sentinels() {
        assert_eq!(
            normalize_value("rx_power", FieldKind::Float, "-002.5157"),
            Ok(Some(FieldValue::Float(-2.5157)))
        );
    }

    #[test]
    fn test_table_normalizes_row() {
        let table = FieldTable::standard();
        let normalized = table
            .normalize(&row(&[
                ("interface", "Gi1/0/1"),
                ("speed", "a-100"),
                ("description", "N/A"),
                ("chassis_id", "0011.2233.4455"),
                ("management_ipv4", "10.0.0.2"),
                ("tag", "Yes"),
                ("port_vlan", "10"),
            ]))
            .unwrap();

        assert_eq!(normalized.require_text("interface").unwrap(), "Gi1/0/1");
        assert_eq!(normalized.speed("speed"), Some(100));
        assert_eq!(normalized.text("description"), None);
        assert_eq!(
            normalized.mac("chassis_id").unwrap().to_string(),
            "00:11:22:33:44:55"
        );
        assert_eq!(normalized.ipv4("management_ipv4"), Some(Ipv4Addr::new(10, 0, 0, 2)));
        assert_eq!(normalized.flag("tag"), Some(true));
        assert_eq!(normalized.u16("port_vlan"), Ok(Some(10)));
    }

    #[test]
    fn test_generic_status_column_stays_text() {
        let normalized = FieldTable::standard()
            .normalize(&row(&[("status", "connected"), ("pair_status", "Open")]))
            .unwrap();
        assert_eq!(normalized.text("status").as_deref(), Some("connected"));
        assert_eq!(normalized.tdr_status("pair_status"), Some(TdrStatus::Open));
    }

    #[test]
    fn test_invalid_value_fails_batch() {
        let table = FieldTable::standard();
        let rows = vec![
            row(&[("interface", "1/1/1"), ("mac", "cc4e.246d.a1c0")]),
            row(&[("interface", "1/1/2"), ("mac", "not-a-mac")]),
        ];
        assert_eq!(
            table.normalize_all(&rows),
            Err(ValidationError::Mac("not-a-mac".to_string()))
        );
    }

    #[test]
    fn test_missing_required_field() {
        let normalized = FieldTable::standard().normalize(&row(&[("interface", "")])).unwrap();
        assert_eq!(
            normalized.require_text("interface"),
            Err(ValidationError::MissingField("interface".to_string()))
        );
    }

    #[test]
    fn test_thresholds_half_open_bands() {
        let t = Thresholds::new("rx_power", -20.0, -17.0, 2.0, 3.0).unwrap();
        assert_eq!(t.classify(-25.0), Some(OpticAlert::LowAlarm));
        assert_eq!(t.classify(-20.0), Some(OpticAlert::LowWarn));
        assert_eq!(t.classify(-17.0), Some(OpticAlert::Normal));
        assert_eq!(t.classify(1.99), Some(OpticAlert::Normal));
        assert_eq!(t.classify(2.0), Some(OpticAlert::HighWarn));
        assert_eq!(t.classify(3.0), Some(OpticAlert::HighAlarm));
        assert_eq!(t.classify(1e9), Some(OpticAlert::HighAlarm));
        assert_eq!(t.classify(f64::NAN), None);
    }

    #[test]
    fn test_thresholds_must_be_ordered() {
        assert_eq!(
            Thresholds::new("voltage", 3.0, 2.9, 3.5, 3.6),
            Err(ValidationError::Thresholds("voltage".to_string()))
        );
        assert_eq!(
            ValidationError::Thresholds("voltage".to_string()).to_string(),
            "optical thresholds for 'voltage' are out of order"
        );
    }

    #[test]
    fn test_thresholds_from_row() {
        let table = FieldTable::standard();
        let full = table
            .normalize(&row(&[
                ("temperature_low_alarm", "-5.0"),
                ("temperature_low_warn", "0.0"),
                ("temperature_high_warn", "70.0"),
                ("temperature_high_alarm", "75.0"),
            ]))
            .unwrap();
        assert!(Thresholds::from_row(&full, "temperature").unwrap().is_some());

        let partial = table
            .normalize(&row(&[("temperature_low_alarm", "-5.0"), ("temperature_low_warn", "N/A")]))
            .unwrap();
        assert_eq!(Thresholds::from_row(&partial, "temperature"), Ok(None));
    }
}
