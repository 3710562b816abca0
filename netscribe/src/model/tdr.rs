use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValidationError;
use crate::normalize::NormalizedRow;

/// Result of a cable test on one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TdrStatus {
    /// Properly terminated.
    Normal,
    Open,
    Short,
    Crosstalk,
    ImpedanceMismatch,
    /// The pair is not tested at the negotiated speed.
    NotSupported,
}

impl TdrStatus {
    /// Whether the status reports a cable fault with a meaningful distance.
    pub fn is_fault(&self) -> bool {
        matches!(self, TdrStatus::Open | TdrStatus::Short)
    }
}

impl FromStr for TdrStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match status.as_str() {
            "normal" | "terminated" | "ok" | "good" => Ok(TdrStatus::Normal),
            "open" => Ok(TdrStatus::Open),
            "short" => Ok(TdrStatus::Short),
            "crosstalk" => Ok(TdrStatus::Crosstalk),
            "impedancemismatch" | "impedance" => Ok(TdrStatus::ImpedanceMismatch),
            "notsupported" | "nottested" => Ok(TdrStatus::NotSupported),
            _ => Err(ValidationError::TdrStatus(s.to_string())),
        }
    }
}

impl fmt::Display for TdrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TdrStatus::Normal => "normal",
            TdrStatus::Open => "open",
            TdrStatus::Short => "short",
            TdrStatus::Crosstalk => "crosstalk",
            TdrStatus::ImpedanceMismatch => "impedance-mismatch",
            TdrStatus::NotSupported => "not-supported",
        };
        f.write_str(label)
    }
}

/// Test result for one local pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairResult {
    pub remote_pair: Option<String>,
    pub status: TdrStatus,
    /// Distance to the fault in metres; only set for open and short
    /// when the device reports an exact reading.
    pub distance_m: Option<u16>,
}

impl PairResult {
    fn from_row(row: &NormalizedRow) -> Result<Self, ValidationError> {
        let status = row
            .tdr_status("pair_status")
            .ok_or_else(|| ValidationError::MissingField("pair_status".to_string()))?;
        // `<50` and similar only bound the fault position.
        let bounded = row.text("distance_bound").is_some();
        let distance_m = if status.is_fault() && !bounded {
            row.u16("distance")?
        } else {
            None
        };
        Ok(Self {
            remote_pair: row.text("remote_pair"),
            status,
            distance_m,
        })
    }
}

/// Cable test of one copper interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceTdr {
    pub host: String,
    pub interface: String,
    pub speed_mbps: Option<u32>,
    pub pair_a: Option<PairResult>,
    pub pair_b: Option<PairResult>,
    pub pair_c: Option<PairResult>,
    pub pair_d: Option<PairResult>,
}

impl InterfaceTdr {
    /// Build from the per-pair rows of one interface.
    pub fn from_rows(
        host: &str,
        interface: &str,
        rows: &[NormalizedRow],
    ) -> Result<Self, ValidationError> {
        let mut tdr = Self {
            host: host.to_string(),
            interface: interface.to_string(),
            speed_mbps: None,
            pair_a: None,
            pair_b: None,
            pair_c: None,
            pair_d: None,
        };

        for row in rows {
            tdr.speed_mbps = tdr.speed_mbps.or(row.speed("speed"));
            let local = row.require_text("local_pair")?;
            let slot = match local.to_ascii_uppercase().as_str() {
                "A" => &mut tdr.pair_a,
                "B" => &mut tdr.pair_b,
                "C" => &mut tdr.pair_c,
                "D" => &mut tdr.pair_d,
                _ => return Err(ValidationError::MissingField(format!("local_pair {local}"))),
            };
            *slot = Some(PairResult::from_row(row)?);
        }
        Ok(tdr)
    }

    pub fn pairs(&self) -> [Option<&PairResult>; 4] {
        [
            self.pair_a.as_ref(),
            self.pair_b.as_ref(),
            self.pair_c.as_ref(),
            self.pair_d.as_ref(),
        ]
    }

    /// Whether any tested pair reports something other than normal.
    pub fn has_fault(&self) -> bool {
        self.pairs()
            .into_iter()
            .flatten()
            .any(|pair| !matches!(pair.status, TdrStatus::Normal | TdrStatus::NotSupported))
    }
}
