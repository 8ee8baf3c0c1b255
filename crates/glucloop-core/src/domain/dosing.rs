use chrono::{DateTime, Utc};

/// A temp-basal recommendation produced by the pipeline. `None` until a
/// prediction exists and the recommendation math has something to say.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    pub issued_at: DateTime<Utc>,
    pub rate_units_per_hour: f64,
    pub duration: chrono::Duration,
}

/// The most recently enacted temp basal, carried forward as an input to the
/// next recommendation so the math can avoid oscillation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempBasal {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub rate_units_per_hour: f64,
}

/// A recently enacted bolus, retained briefly so a pending bolus is not
/// double-counted by the next bolus recommendation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BolusRecord {
    pub units: f64,
    pub enacted_at: DateTime<Utc>,
}

/// What the device acknowledged after a `set_temp_basal` dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempBasalAck {
    pub rate_units_per_hour: f64,
    pub time_remaining: chrono::Duration,
}
