//! Event Ingress (§4.E): the three inbound-signal handlers plus the
//! caller-driven carb-entry addition path.

use std::sync::Arc;

use chrono::Utc;
use kameo::actor::ActorRef;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use super::cache_actor::{
    EffectCacheActor, GetWaitingForSentry, SentryFired, SetCarbs, SetMomentum, SetWaitingForSentry,
};
use super::dosing_gate::DosingGate;
use super::events::LoopEvent;
use super::pipeline::DecisionPipeline;
use crate::domain::{CarbEntry, LoopError, RECENCY_INTERVAL, SENTRY_QUIET_WINDOW};
use crate::ports::{CarbStore, PumpDevice, PumpStatusProvider};

pub struct EventIngress {
    cache: ActorRef<EffectCacheActor>,
    pipeline: Arc<DecisionPipeline>,
    dosing_gate: Arc<DosingGate>,
    carb_store: Option<Arc<dyn CarbStore>>,
    pump_status: Arc<dyn PumpStatusProvider>,
    pump: Arc<dyn PumpDevice>,
    events: broadcast::Sender<LoopEvent>,
    pending_sentry: Mutex<Option<JoinHandle<()>>>,
}

impl EventIngress {
    pub fn new(
        cache: ActorRef<EffectCacheActor>,
        pipeline: Arc<DecisionPipeline>,
        dosing_gate: Arc<DosingGate>,
        carb_store: Option<Arc<dyn CarbStore>>,
        pump_status: Arc<dyn PumpStatusProvider>,
        pump: Arc<dyn PumpDevice>,
        events: broadcast::Sender<LoopEvent>,
    ) -> Self {
        Self {
            cache,
            pipeline,
            dosing_gate,
            carb_store,
            pump_status,
            pump,
            events,
            pending_sentry: Mutex::new(None),
        }
    }

    /// `GlucoseUpdated`: clears `momentum`, notifies, and fire-and-forgets a
    /// radio retune request when telemetry and the last retune both look
    /// stale.
    pub async fn glucose_updated(&self) {
        self.cache
            .tell(SetMomentum(None))
            .await
            .expect("effect cache actor unavailable");
        self.notify_data_updated().await;

        let now = Utc::now();
        let pump_status_stale = match self.pump_status.latest().await {
            Some(status) => now - status.date > RECENCY_INTERVAL,
            None => true,
        };
        if !pump_status_stale {
            return;
        }
        let retuned_recently = match self.pump.last_tuned().await {
            Some(last_tuned) => now - last_tuned <= RECENCY_INTERVAL,
            None => false,
        };
        if retuned_recently {
            return;
        }

        let pump = Arc::clone(&self.pump);
        tokio::spawn(async move {
            if let Err(err) = pump.tune().await {
                tracing::warn!(error = %err, "pump radio retune request failed");
            }
        });
    }

    /// `PumpStatusUpdated`: opens the sentry quiet window (§4.E, §9).
    pub async fn pump_status_updated(&self) {
        self.cache
            .tell(SetWaitingForSentry(true))
            .await
            .expect("effect cache actor unavailable");
        let _ = self.events.send(LoopEvent::LoopRunning);

        let cache = self.cache.clone();
        let pipeline = Arc::clone(&self.pipeline);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(SENTRY_QUIET_WINDOW).await;
            cache
                .tell(SentryFired)
                .await
                .expect("effect cache actor unavailable");
            pipeline.run_loop().await;
        });

        let mut pending = self.pending_sentry.lock().await;
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// `CarbEntriesDidUpdate`: clears `carbs`, notifies.
    pub async fn carb_entries_updated(&self) {
        self.cache
            .tell(SetCarbs(None))
            .await
            .expect("effect cache actor unavailable");
        self.notify_data_updated().await;
    }

    /// Caller-driven combined write + recommend (§4.E).
    pub async fn add_carb_entry(&self, entry: CarbEntry) -> Result<f64, LoopError> {
        let carb_store = self
            .carb_store
            .as_ref()
            .ok_or_else(|| LoopError::ConfigurationError("carb store not available".into()))?;
        carb_store.add_carb_entry(entry).await?;
        self.cache
            .tell(SetCarbs(None))
            .await
            .expect("effect cache actor unavailable");
        self.pipeline.update().await?;
        self.dosing_gate.recommend_bolus().await
    }

    /// Aborts any in-flight sentry task. Called by `LoopEngine::stop()`.
    pub async fn cancel_pending_sentry(&self) {
        if let Some(handle) = self.pending_sentry.lock().await.take() {
            handle.abort();
        }
    }

    /// `notify()` in §4.E: suppressed while `waitingForSentry` so observers
    /// are informed only once per tick, after the delayed loop completes.
    async fn notify_data_updated(&self) {
        let waiting = self
            .cache
            .ask(GetWaitingForSentry)
            .await
            .expect("effect cache actor unavailable");
        if !waiting {
            let _ = self.events.send(LoopEvent::LoopDataUpdated);
        }
    }
}
