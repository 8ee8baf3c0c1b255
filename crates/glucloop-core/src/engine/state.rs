use chrono::{DateTime, Utc};

use crate::domain::{BolusRecord, EffectSeries, LoopError, Prediction, Recommendation, TempBasal};

/// Everything the decision queue owns (§3, invariant 4). Reachable only
/// through `EffectCacheActor`'s mailbox, never shared behind a lock.
#[derive(Debug, Default, Clone)]
pub struct EngineState {
    pub momentum: Option<EffectSeries>,
    pub carbs: Option<EffectSeries>,
    pub insulin: Option<EffectSeries>,
    pub prediction: Option<Prediction>,
    pub recommendation: Option<Recommendation>,
    pub last_temp_basal: Option<TempBasal>,
    pub last_bolus: Option<BolusRecord>,
    pub last_loop_completed: Option<DateTime<Utc>>,
    pub last_loop_error: Option<LoopError>,
    pub waiting_for_sentry: bool,
}

/// Which effect slots are currently empty, as seen by the Refresh
/// Coordinator (§4.C).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissingEffects {
    pub momentum: bool,
    pub carbs: bool,
    pub insulin: bool,
}

impl MissingEffects {
    pub fn any(&self) -> bool {
        self.momentum || self.carbs || self.insulin
    }
}

/// A read-only view handed back from `get_status()` (§4.D).
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub prediction: Option<Prediction>,
    pub recommendation: Option<Recommendation>,
    pub last_temp_basal: Option<TempBasal>,
    pub last_loop_completed: Option<DateTime<Utc>>,
    pub last_loop_error: Option<LoopError>,
}

impl From<&EngineState> for StatusSnapshot {
    fn from(state: &EngineState) -> Self {
        Self {
            prediction: state.prediction.clone(),
            recommendation: state.recommendation,
            last_temp_basal: state.last_temp_basal,
            last_loop_completed: state.last_loop_completed,
            last_loop_error: state.last_loop_error.clone(),
        }
    }
}
