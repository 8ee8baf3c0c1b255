//! Data model shared by the whole engine: glucose/carb/pump inputs, the
//! three effect series, the prediction, and the dosing outputs.

pub mod config_snapshot;
pub mod dosing;
pub mod effect;
pub mod errors;
pub mod glucose;
pub mod prediction;
pub mod schedule;

pub use config_snapshot::ConfigurationSnapshot;
pub use dosing::{BolusRecord, Recommendation, TempBasal, TempBasalAck};
pub use effect::{EffectPoint, EffectSeries};
pub use errors::LoopError;
pub use glucose::{CarbEntry, GlucoseSample, PumpStatus};
pub use prediction::{Prediction, PredictionPoint};
pub use schedule::{DailySchedule, GlucoseTargetRange};

/// Recency interval (§6): glucose and pump-status inputs older than this
/// are stale and dosing must not proceed.
pub const RECENCY_INTERVAL: chrono::Duration = chrono::Duration::minutes(15);

/// Recommendation freshness (§6): a recommendation older than this is not
/// enacted even if dosing inputs are otherwise fresh.
pub const RECOMMENDATION_FRESHNESS: chrono::Duration = chrono::Duration::minutes(5);

/// Sentry quiet window (§6): delay after `PumpStatusUpdated` before the
/// loop actually runs, to dodge the pump's 3-packets-in-5-seconds burst.
pub const SENTRY_QUIET_WINDOW: std::time::Duration = std::time::Duration::from_secs(11);

/// Bolus retention window (§6): how long a `last bolus` is kept around to
/// subtract from the next bolus recommendation.
pub const BOLUS_RETENTION_WINDOW: chrono::Duration = chrono::Duration::minutes(5);

/// Whether the temp-basal recommendation math is allowed to suggest a
/// predictive low temp (§6). Always true per spec; named so call sites
/// read as intentional rather than a stray literal.
pub const ALLOW_PREDICTIVE_TEMP_BELOW_RANGE: bool = true;
