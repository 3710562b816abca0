use indexmap::IndexMap;
use serde::Serialize;

use crate::error::ValidationError;
use crate::normalize::NormalizedRow;

/// Chassis-wide PoE budget, in watts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoeHost {
    pub host: String,
    pub capacity_w: Option<f64>,
    pub consumed_w: Option<f64>,
    pub available_w: Option<f64>,
}

/// PoE state of one port, in watts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoePort {
    pub host: String,
    pub interface: String,
    pub admin_state: Option<String>,
    pub oper_state: Option<String>,
    pub consumed_w: Option<f64>,
    pub allocated_w: Option<f64>,
    pub device: Option<String>,
    pub power_class: Option<String>,
    pub priority: Option<String>,
    pub error: Option<String>,
}

/// Budget plus per-port state, keyed by interface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoeStatus {
    pub host: PoeHost,
    pub ports: IndexMap<String, PoePort>,
}

impl PoeStatus {
    /// Split PoE rows into the chassis budget and ports.
    ///
    /// Rows carrying an interface are ports; rows carrying totals are
    /// summed into the budget (one per stack member or module). With
    /// `milliwatts`, every figure is converted to watts.
    pub fn from_rows(
        host: &str,
        rows: &[NormalizedRow],
        milliwatts: bool,
    ) -> Result<Self, ValidationError> {
        let scale = if milliwatts { 1000.0 } else { 1.0 };
        let watts = |row: &NormalizedRow, field: &str| row.float(field).map(|v| v / scale);

        let mut capacity = None;
        let mut consumed = None;
        let mut available = None;
        let mut ports = IndexMap::new();

        for row in rows {
            if row.text("interface").is_some() {
                let port = PoePort {
                    host: host.to_string(),
                    interface: row.require_text("interface")?,
                    admin_state: row.text("admin_state"),
                    oper_state: row.text("oper_state"),
                    consumed_w: watts(row, "consumed"),
                    allocated_w: watts(row, "allocated"),
                    device: row.text("device"),
                    power_class: row.text("power_class"),
                    priority: row.text("priority"),
                    error: row.text("error"),
                };
                ports.insert(port.interface.clone(), port);
                continue;
            }

            let row_capacity = watts(row, "total_capacity");
            let row_available = watts(row, "total_available");
            let row_consumed = watts(row, "total_consumed").or(match (row_capacity, row_available) {
                (Some(c), Some(a)) => Some(c - a),
                _ => None,
            });
            capacity = add(capacity, row_capacity);
            available = add(available, row_available);
            consumed = add(consumed, row_consumed);
        }

        Ok(Self {
            host: PoeHost {
                host: host.to_string(),
                capacity_w: capacity,
                consumed_w: consumed,
                available_w: available,
            },
            ports,
        })
    }
}

fn add(total: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (total, value) {
        (Some(t), Some(v)) => Some(t + v),
        (t, v) => t.or(v),
    }
}
