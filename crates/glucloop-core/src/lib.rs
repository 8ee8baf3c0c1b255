pub mod domain;
pub mod engine;
pub mod ports;
pub mod reference_math;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use domain::{
    BolusRecord, CarbEntry, ConfigurationSnapshot, DailySchedule, EffectPoint, EffectSeries,
    GlucoseSample, GlucoseTargetRange, LoopError, Prediction, PredictionPoint, PumpStatus,
    Recommendation, TempBasal, TempBasalAck,
};
pub use engine::{Collaborators, LoopEngine, LoopEvent, StatusSnapshot};
pub use ports::{
    CarbStore, ConfigProvider, DoseStore, GlucoseStore, PredictionMath, PumpDevice,
    PumpStatusProvider, RecommendationMath,
};
pub use reference_math::{LinearSumPredictionMath, ProportionalRecommendationMath};
