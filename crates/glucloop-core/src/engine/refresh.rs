//! The Refresh Coordinator (§4.C): fans out to whichever collaborator
//! stores back currently-empty effect slots, in parallel, and joins.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kameo::actor::ActorRef;

use super::cache_actor::{EffectCacheActor, GetMissingEffects, SetCarbs, SetInsulin, SetMomentum};
use crate::domain::LoopError;
use crate::ports::{CarbStore, DoseStore, GlucoseStore};

pub struct RefreshCoordinator {
    glucose_store: Option<Arc<dyn GlucoseStore>>,
    carb_store: Option<Arc<dyn CarbStore>>,
    dose_store: Option<Arc<dyn DoseStore>>,
    cache: ActorRef<EffectCacheActor>,
}

impl RefreshCoordinator {
    pub fn new(
        glucose_store: Option<Arc<dyn GlucoseStore>>,
        carb_store: Option<Arc<dyn CarbStore>>,
        dose_store: Option<Arc<dyn DoseStore>>,
        cache: ActorRef<EffectCacheActor>,
    ) -> Self {
        Self {
            glucose_store,
            carb_store,
            dose_store,
            cache,
        }
    }

    /// Repopulates any of {momentum, carbs, insulin} that are currently
    /// `None`, anchored at `start_after`. Returns once all three fan-out
    /// requests have completed, success or failure — a per-effect failure
    /// never aborts the others (§4.C).
    pub async fn refresh_missing(&self, start_after: DateTime<Utc>) {
        let missing = self
            .cache
            .ask(GetMissingEffects)
            .await
            .expect("effect cache actor unavailable");

        if !missing.any() {
            return;
        }

        let momentum = async {
            if !missing.momentum {
                return;
            }
            let result = match &self.glucose_store {
                Some(store) => store.get_recent_momentum_effect(start_after).await,
                None => Err(LoopError::MissingData("glucose store not available".into())),
            };
            self.apply_momentum(result).await;
        };

        let carbs = async {
            if !missing.carbs {
                return;
            }
            let result = match &self.carb_store {
                Some(store) => store.get_glucose_effects(start_after).await,
                None => Err(LoopError::MissingData("carb store not available".into())),
            };
            self.apply_carbs(result).await;
        };

        let insulin = async {
            if !missing.insulin {
                return;
            }
            let result = match &self.dose_store {
                Some(store) => store.get_glucose_effects(start_after).await,
                None => Err(LoopError::MissingData("dose store not available".into())),
            };
            self.apply_insulin(result).await;
        };

        tokio::join!(momentum, carbs, insulin);
    }

    async fn apply_momentum(&self, result: Result<crate::domain::EffectSeries, LoopError>) {
        match result {
            Ok(series) => {
                self.cache
                    .tell(SetMomentum(Some(series)))
                    .await
                    .expect("effect cache actor unavailable");
            }
            Err(err) => {
                tracing::warn!(error = %err, "momentum refresh failed");
                self.cache
                    .tell(SetMomentum(None))
                    .await
                    .expect("effect cache actor unavailable");
            }
        }
    }

    async fn apply_carbs(&self, result: Result<crate::domain::EffectSeries, LoopError>) {
        match result {
            Ok(series) => {
                self.cache
                    .tell(SetCarbs(Some(series)))
                    .await
                    .expect("effect cache actor unavailable");
            }
            Err(err) => {
                tracing::warn!(error = %err, "carb effect refresh failed");
                self.cache
                    .tell(SetCarbs(None))
                    .await
                    .expect("effect cache actor unavailable");
            }
        }
    }

    async fn apply_insulin(&self, result: Result<crate::domain::EffectSeries, LoopError>) {
        match result {
            Ok(series) => {
                self.cache
                    .tell(SetInsulin(Some(series)))
                    .await
                    .expect("effect cache actor unavailable");
            }
            Err(err) => {
                tracing::warn!(error = %err, "insulin effect refresh failed");
                self.cache
                    .tell(SetInsulin(None))
                    .await
                    .expect("effect cache actor unavailable");
            }
        }
    }
}
