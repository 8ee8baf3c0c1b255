use chrono::{DateTime, Utc};

/// One point of a glucose-effect time series: how much the effect shifts
/// glucose, in mg/dL, at `date`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectPoint {
    pub date: DateTime<Utc>,
    pub delta_mg_dl: f64,
}

/// An ordered, finite effect series. An empty `Vec` is a valid series (all
/// zero effect) and is distinct from the effect being entirely absent,
/// which is represented at the call site as `Option<EffectSeries>`.
pub type EffectSeries = Vec<EffectPoint>;
