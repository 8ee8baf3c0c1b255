use super::schedule::{DailySchedule, GlucoseTargetRange};

/// Everything the prediction step needs from configuration, read once per
/// step per the "configuration snapshotting" design note (§9) so a
/// mid-step config change can't produce an inconsistent recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationSnapshot {
    pub max_basal_units_per_hour: f64,
    pub max_bolus_units: f64,
    pub target_range_schedule: DailySchedule<GlucoseTargetRange>,
    pub sensitivity_schedule: DailySchedule<f64>,
    pub basal_schedule: DailySchedule<f64>,
}
