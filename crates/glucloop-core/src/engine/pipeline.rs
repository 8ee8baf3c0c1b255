//! The Decision Pipeline (§4.D): `update()`'s seven-step prediction
//! computation, plus the two public entry points `run_loop()` and
//! `get_status()`.

use std::sync::Arc;

use chrono::Utc;
use kameo::actor::ActorRef;
use tokio::sync::broadcast;

use super::cache_actor::{
    EffectCacheActor, GetState, GetStatus, GetWaitingForSentry, SetLastLoopCompleted,
    SetLastLoopError, SetPrediction, SetRecommendation,
};
use super::dosing_gate::DosingGate;
use super::events::LoopEvent;
use super::refresh::RefreshCoordinator;
use super::state::{EngineState, StatusSnapshot};
use crate::domain::{LoopError, Prediction, Recommendation, ALLOW_PREDICTIVE_TEMP_BELOW_RANGE, RECENCY_INTERVAL};
use crate::ports::{ConfigProvider, GlucoseStore, PredictionMath, PumpStatusProvider, RecommendationMath};

pub struct DecisionPipeline {
    refresh: RefreshCoordinator,
    cache: ActorRef<EffectCacheActor>,
    glucose_store: Arc<dyn GlucoseStore>,
    pump_status: Arc<dyn PumpStatusProvider>,
    config: Arc<dyn ConfigProvider>,
    prediction_math: Arc<dyn PredictionMath>,
    recommendation_math: Arc<dyn RecommendationMath>,
    dosing_gate: Arc<DosingGate>,
    events: broadcast::Sender<LoopEvent>,
}

impl DecisionPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        refresh: RefreshCoordinator,
        cache: ActorRef<EffectCacheActor>,
        glucose_store: Arc<dyn GlucoseStore>,
        pump_status: Arc<dyn PumpStatusProvider>,
        config: Arc<dyn ConfigProvider>,
        prediction_math: Arc<dyn PredictionMath>,
        recommendation_math: Arc<dyn RecommendationMath>,
        dosing_gate: Arc<DosingGate>,
        events: broadcast::Sender<LoopEvent>,
    ) -> Self {
        Self {
            refresh,
            cache,
            glucose_store,
            pump_status,
            config,
            prediction_math,
            recommendation_math,
            dosing_gate,
            events,
        }
    }

    /// Refreshes missing effects, then computes a prediction if one isn't
    /// already cached. Errors from the prediction computation propagate to
    /// the caller; `prediction` is left `None` (§4.D step 3).
    pub(crate) async fn update(&self) -> Result<(), LoopError> {
        self.refresh.refresh_missing(Utc::now()).await;

        let state = self
            .cache
            .ask(GetState)
            .await
            .expect("effect cache actor unavailable");

        if state.prediction.is_some() {
            return Ok(());
        }

        let result = self.compute_prediction(&state).await;

        match &result {
            Ok((prediction, recommendation)) => {
                tracing::info!(
                    ?prediction,
                    ?recommendation,
                    "loop update settled"
                );
                self.cache
                    .tell(SetPrediction(Some(prediction.clone())))
                    .await
                    .expect("effect cache actor unavailable");
                self.cache
                    .tell(SetRecommendation(*recommendation))
                    .await
                    .expect("effect cache actor unavailable");
            }
            Err(err) => {
                tracing::warn!(error = %err, "loop update failed");
            }
        }

        result.map(|_| ())
    }

    /// §4.D "Prediction computation": steps 1-7.
    async fn compute_prediction(
        &self,
        state: &EngineState,
    ) -> Result<(Prediction, Option<Recommendation>), LoopError> {
        let now = Utc::now();

        // Step 1: require latest glucose sample and pump status timestamp.
        let latest_glucose = self
            .glucose_store
            .latest_glucose()
            .await
            .ok_or_else(|| LoopError::MissingData("no glucose sample available".into()))?;
        let pump_status = self
            .pump_status
            .latest()
            .await
            .ok_or_else(|| LoopError::MissingData("no pump status available".into()))?;

        // Step 2: both must be within the recency interval of "now".
        if now - latest_glucose.date > RECENCY_INTERVAL {
            return Err(LoopError::StaleData(format!(
                "glucose sample from {} exceeds the recency interval",
                latest_glucose.date
            )));
        }
        if now - pump_status.date > RECENCY_INTERVAL {
            return Err(LoopError::StaleData(format!(
                "pump status from {} exceeds the recency interval",
                pump_status.date
            )));
        }

        // Step 3: require all three effects present.
        let (momentum, carbs, insulin) = match (&state.momentum, &state.carbs, &state.insulin) {
            (Some(momentum), Some(carbs), Some(insulin)) => (momentum, carbs, insulin),
            _ => {
                return Err(LoopError::MissingData(
                    "Cannot predict glucose due to missing effect data".into(),
                ))
            }
        };

        // Step 4: call the prediction math seam.
        let prediction = self
            .prediction_math
            .predict(latest_glucose, momentum, carbs, insulin);

        // Step 5: require the configuration snapshot complete.
        let config = self
            .config
            .snapshot()
            .await
            .ok_or_else(|| LoopError::MissingData("configuration snapshot incomplete".into()))?;

        // Step 6: call the recommendation math seam and stamp with "now".
        let recommendation = self
            .recommendation_math
            .recommend_temp_basal(
                &prediction,
                state.last_temp_basal,
                &config,
                ALLOW_PREDICTIVE_TEMP_BELOW_RANGE,
            )
            .map(|recommendation| Recommendation {
                issued_at: now,
                ..recommendation
            });

        Ok((prediction, recommendation))
    }

    /// The fire-and-forget tick (§4.D).
    pub async fn run_loop(&self) {
        self.cache
            .tell(SetLastLoopError(None))
            .await
            .expect("effect cache actor unavailable");

        if let Err(err) = self.update().await {
            self.cache
                .tell(SetLastLoopError(Some(err.clone())))
                .await
                .expect("effect cache actor unavailable");
            self.emit(LoopEvent::AnalyticsError(err));
            self.notify_if_not_waiting().await;
            return;
        }

        if !self.config.dosing_enabled().await {
            self.cache
                .tell(SetLastLoopCompleted(Utc::now()))
                .await
                .expect("effect cache actor unavailable");
            self.emit(LoopEvent::AnalyticsLoopCompleted);
            self.notify_if_not_waiting().await;
            return;
        }

        // Dosing enabled: the gate owns the terminal notification for this
        // path (§4.E ↔ 4.F coupling) — `run_loop` does not notify itself.
        match self.dosing_gate.set_recommended_temp_basal().await {
            Ok(()) => {
                self.cache
                    .tell(SetLastLoopCompleted(Utc::now()))
                    .await
                    .expect("effect cache actor unavailable");
                self.emit(LoopEvent::AnalyticsLoopCompleted);
            }
            Err(err) => {
                self.cache
                    .tell(SetLastLoopError(Some(err.clone())))
                    .await
                    .expect("effect cache actor unavailable");
                self.emit(LoopEvent::AnalyticsError(err));
            }
        }
        self.notify_if_not_waiting().await;
    }

    /// Read with refresh (§4.D). Does not enact dosing. An `update()`
    /// failure is folded into the returned snapshot's `last_loop_error`
    /// without otherwise mutating cached state.
    pub async fn get_status(&self) -> StatusSnapshot {
        let update_result = self.update().await;
        let mut status = self
            .cache
            .ask(GetStatus)
            .await
            .expect("effect cache actor unavailable");
        if let Err(err) = update_result {
            status.last_loop_error = Some(err);
        }
        status
    }

    async fn notify_if_not_waiting(&self) {
        let waiting = self
            .cache
            .ask(GetWaitingForSentry)
            .await
            .expect("effect cache actor unavailable");
        if !waiting {
            self.emit(LoopEvent::LoopDataUpdated);
        }
    }

    fn emit(&self, event: LoopEvent) {
        // No receivers yet is not an error — the engine runs headless.
        let _ = self.events.send(event);
    }
}
