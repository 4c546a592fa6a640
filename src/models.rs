use serde::Deserialize;
use time::OffsetDateTime;

/// Raw JSON payload from the device `/data` endpoint.
///
/// The firmware is inconsistent about field types: numeric readings arrive
/// either as JSON numbers or as strings, and any field can be missing
/// entirely. Each one is kept as a raw value until `parse_metric` runs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub ph: Option<serde_json::Value>,
    #[serde(default)]
    pub tds: Option<serde_json::Value>,
    #[serde(default)]
    pub temp: Option<serde_json::Value>,
    #[serde(default)]
    pub turb: Option<String>,
}

/// One processed sensor reading. Immutable once created; only ever dropped
/// by buffer eviction.
#[derive(Debug, Clone)]
pub struct Sample {
    pub ph: f64,
    pub tds: f64,
    /// Quantized from the categorical `turb` field: DIRTY maps to 10.0 NTU,
    /// anything else to 0.5. The device has no real turbidity ADC, so the
    /// two-level mapping is the actual measurement resolution.
    pub turbidity: f64,
    /// Raw categorical turbidity status, UNKNOWN when the field is absent.
    pub turbidity_status: String,
    pub temperature: f64,
    pub timestamp: OffsetDateTime,
}

impl Sample {
    /// Build a sample from a raw snapshot. Numeric fields that fail to parse
    /// stay NaN; the caller decides whether to flag that.
    pub fn from_raw(raw: &RawSnapshot, timestamp: OffsetDateTime) -> Self {
        let status = raw.turb.clone().unwrap_or_else(|| "UNKNOWN".to_string());
        Sample {
            ph: parse_metric(raw.ph.as_ref()),
            tds: parse_metric(raw.tds.as_ref()),
            turbidity: if status == "DIRTY" { 10.0 } else { 0.5 },
            turbidity_status: status,
            temperature: parse_metric(raw.temp.as_ref()),
            timestamp,
        }
    }

    /// True when any numeric field failed to parse.
    pub fn has_missing_readings(&self) -> bool {
        self.ph.is_nan() || self.tds.is_nan() || self.temperature.is_nan()
    }
}

/// Parse a number-or-string JSON value into f64, NaN on failure.
fn parse_metric(value: Option<&serde_json::Value>) -> f64 {
    match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Device reachability as seen by the acquisition loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Offline,
    Connecting,
    Online,
}
