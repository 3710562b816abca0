use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValidationError;
use crate::normalize::{NormalizedRow, OPTIC_PARAMETERS, Thresholds};
use crate::platform::AlertSource;

/// Alert level of a transceiver reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpticAlert {
    Normal,
    LowWarn,
    HighWarn,
    LowAlarm,
    HighAlarm,
}

impl OpticAlert {
    pub fn is_normal(&self) -> bool {
        matches!(self, OpticAlert::Normal)
    }
}

impl FromStr for OpticAlert {
    type Err = ValidationError;

    /// Accepts labels such as `Normal`, `Low-Warn`, `high_alarm`,
    /// `Low Warning`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match label.as_str() {
            "normal" | "ok" => Ok(OpticAlert::Normal),
            "lowwarn" | "lowwarning" => Ok(OpticAlert::LowWarn),
            "highwarn" | "highwarning" => Ok(OpticAlert::HighWarn),
            "lowalarm" => Ok(OpticAlert::LowAlarm),
            "highalarm" => Ok(OpticAlert::HighAlarm),
            _ => Err(ValidationError::Alert(s.to_string())),
        }
    }
}

impl fmt::Display for OpticAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OpticAlert::Normal => "normal",
            OpticAlert::LowWarn => "low-warn",
            OpticAlert::HighWarn => "high-warn",
            OpticAlert::LowAlarm => "low-alarm",
            OpticAlert::HighAlarm => "high-alarm",
        };
        f.write_str(label)
    }
}

/// A transceiver measurement and its alert level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpticReading {
    pub value: f64,
    pub alert: Option<OpticAlert>,
}

/// Diagnostics of one transceiver.
///
/// Units: °C, volts, milliamperes, dBm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceOptics {
    pub host: String,
    pub interface: String,
    pub temperature: Option<OpticReading>,
    pub voltage: Option<OpticReading>,
    pub current: Option<OpticReading>,
    pub tx_power: Option<OpticReading>,
    pub rx_power: Option<OpticReading>,
}

impl InterfaceOptics {
    pub fn from_row(
        host: &str,
        row: &NormalizedRow,
        source: AlertSource,
    ) -> Result<Self, ValidationError> {
        let mut readings = [None; 5];
        for (slot, parameter) in readings.iter_mut().zip(OPTIC_PARAMETERS) {
            *slot = reading(row, parameter, source)?;
        }
        let [temperature, voltage, current, tx_power, rx_power] = readings;

        Ok(Self {
            host: host.to_string(),
            interface: row.require_text("interface")?,
            temperature,
            voltage,
            current,
            tx_power,
            rx_power,
        })
    }

    /// Readings that are not normal, by parameter name.
    pub fn alerts(&self) -> Vec<(&'static str, OpticAlert)> {
        let readings = [
            self.temperature,
            self.voltage,
            self.current,
            self.tx_power,
            self.rx_power,
        ];
        OPTIC_PARAMETERS
            .iter()
            .zip(readings)
            .filter_map(|(name, reading)| {
                let alert = reading?.alert?;
                (!alert.is_normal()).then_some((*name, alert))
            })
            .collect()
    }
}

fn reading(
    row: &NormalizedRow,
    parameter: &str,
    source: AlertSource,
) -> Result<Option<OpticReading>, ValidationError> {
    let Some(value) = row.float(parameter) else {
        return Ok(None);
    };

    let alert = match source {
        AlertSource::Labels => row.alert(&format!("{parameter}_alert")),
        AlertSource::Thresholds => {
            Thresholds::from_row(row, parameter)?.and_then(|t| t.classify(value))
        }
    };
    Ok(Some(OpticReading { value, alert }))
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
    fn test_alert_labels() {
        assert_eq!("Normal".parse::<OpticAlert>(), Ok(OpticAlert::Normal));
        assert_eq!("Low-Warn".parse::<OpticAlert>(), Ok(OpticAlert::LowWarn));
        assert_eq!("high_alarm".parse::<OpticAlert>(), Ok(OpticAlert::HighAlarm));
        assert_eq!("Low Warning".parse::<OpticAlert>(), Ok(OpticAlert::LowWarn));
        assert_eq!(
            "Critical".parse::<OpticAlert>(),
            Err(ValidationError::Alert("Critical".to_string()))
        );
    }

    #[test]
    fn test_optics_from_labels() {
        let row = normalized(&[
            ("interface", "1/2/1"),
            ("temperature", "31.8945"),
            ("temperature_alert", "Normal"),
            ("rx_power", "-020.1000"),
            ("rx_power_alert", "Low-Alarm"),
        ]);
        let optics = InterfaceOptics::from_row("sw1", &row, AlertSource::Labels).unwrap();
        assert_eq!(optics.temperature.unwrap().alert, Some(OpticAlert::Normal));
        assert_eq!(optics.rx_power.unwrap().value, -20.1);
        assert_eq!(optics.voltage, None);
        assert_eq!(optics.alerts(), vec![("rx_power", OpticAlert::LowAlarm)]);
    }

    #[test]
    fn test_optics_from_thresholds() {
        let row = normalized(&[
            ("interface", "Te1/1/1"),
            ("tx_power", "-1.5"),
            ("tx_power_high_alarm", "1.0"),
            ("tx_power_high_warn", "-1.0"),
            ("tx_power_low_warn", "-7.3"),
            ("tx_power_low_alarm", "-11.3"),
            ("voltage", "3.29"),
        ]);
        let optics = InterfaceOptics::from_row("sw1", &row, AlertSource::Thresholds).unwrap();
        assert_eq!(optics.tx_power.unwrap().alert, Some(OpticAlert::Normal));
        assert_eq!(
            optics.voltage,
            Some(OpticReading {
                value: 3.29,
                alert: None
            })
        );
    }
}
