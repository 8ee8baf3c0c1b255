use chrono::{DateTime, Utc};

/// One point of a forward-projected glucose trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionPoint {
    pub date: DateTime<Utc>,
    pub value_mg_dl: f64,
}

/// The glucose trajectory obtained by summing momentum, carb, and insulin
/// effects onto the latest glucose sample. Invariant 3 (§3): the first
/// point's date equals the latest glucose sample's date.
pub type Prediction = Vec<PredictionPoint>;
