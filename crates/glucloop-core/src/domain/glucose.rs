use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single glucose reading, ordered monotonically by `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseSample {
    pub date: DateTime<Utc>,
    pub value_mg_dl: f64,
    /// Sensor/source identifier, e.g. "dexcom" or "libre". Not interpreted
    /// by the engine beyond being carried through to logs.
    pub source: String,
}

/// The pump's last reported status: its own clock and how much time is
/// left on any temp basal currently running on the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PumpStatus {
    pub date: DateTime<Utc>,
    pub time_remaining_on_temp: chrono::Duration,
}

/// A single carbohydrate entry as submitted by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CarbEntry {
    pub date: DateTime<Utc>,
    pub grams: f64,
    pub absorption_time: chrono::Duration,
}
