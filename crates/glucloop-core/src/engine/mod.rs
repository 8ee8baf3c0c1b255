//! The engine: the Effect Cache, the Invalidation Graph, the Refresh
//! Coordinator, the Decision Pipeline, Event Ingress, and the Dosing Gate,
//! wired together behind one `LoopEngine` handle.

mod cache_actor;
mod dosing_gate;
mod events;
mod ingress;
mod invalidation;
mod pipeline;
mod refresh;
mod state;

pub use cache_actor::EffectCacheActor;
pub use dosing_gate::DosingGate;
pub use events::{LoopEvent, EVENT_CHANNEL_CAPACITY};
pub use ingress::EventIngress;
pub use pipeline::DecisionPipeline;
pub use refresh::RefreshCoordinator;
pub use state::{EngineState, MissingEffects, StatusSnapshot};

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::domain::{CarbEntry, LoopError};
use crate::ports::{CarbStore, ConfigProvider, DoseStore, GlucoseStore, PredictionMath, PumpDevice, PumpStatusProvider, RecommendationMath};

/// Every collaborator the engine is wired against (§6). Each is optional
/// only where the Refresh Coordinator is documented to tolerate absence
/// (`glucose_store`/`carb_store`/`dose_store`); the rest are mandatory
/// seams the engine cannot function without.
pub struct Collaborators {
    pub glucose_store: Option<Arc<dyn GlucoseStore>>,
    pub carb_store: Option<Arc<dyn CarbStore>>,
    pub dose_store: Option<Arc<dyn DoseStore>>,
    pub pump_status: Arc<dyn PumpStatusProvider>,
    pub pump: Arc<dyn PumpDevice>,
    pub config: Arc<dyn ConfigProvider>,
    pub prediction_math: Arc<dyn PredictionMath>,
    pub recommendation_math: Arc<dyn RecommendationMath>,
}

/// The assembled Loop Decision Engine. Owns the actor mailbox that
/// serializes all engine-state mutation (§5) and exposes exactly the
/// operations named in §4's component design.
pub struct LoopEngine {
    ingress: Arc<EventIngress>,
    pipeline: Arc<DecisionPipeline>,
    cache: kameo::actor::ActorRef<EffectCacheActor>,
    events: broadcast::Sender<LoopEvent>,
}

impl LoopEngine {
    pub fn new(collaborators: Collaborators) -> Self {
        let cache = kameo::spawn(EffectCacheActor::new());
        let (events, _receiver) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let refresh = RefreshCoordinator::new(
            collaborators.glucose_store.clone(),
            collaborators.carb_store.clone(),
            collaborators.dose_store.clone(),
            cache.clone(),
        );

        let dosing_gate = Arc::new(DosingGate::new(
            cache.clone(),
            Arc::clone(&collaborators.pump),
            Arc::clone(&collaborators.config),
            Arc::clone(&collaborators.recommendation_math),
        ));

        let glucose_store_for_pipeline = collaborators
            .glucose_store
            .clone()
            .expect("glucose store is required for the decision pipeline");

        let pipeline = Arc::new(DecisionPipeline::new(
            refresh,
            cache.clone(),
            glucose_store_for_pipeline,
            Arc::clone(&collaborators.pump_status),
            Arc::clone(&collaborators.config),
            Arc::clone(&collaborators.prediction_math),
            Arc::clone(&collaborators.recommendation_math),
            Arc::clone(&dosing_gate),
            events.clone(),
        ));

        let ingress = Arc::new(EventIngress::new(
            cache.clone(),
            Arc::clone(&pipeline),
            dosing_gate,
            collaborators.carb_store.clone(),
            Arc::clone(&collaborators.pump_status),
            Arc::clone(&collaborators.pump),
            events.clone(),
        ));

        Self {
            ingress,
            pipeline,
            cache,
            events,
        }
    }

    /// Registers the engine with the outside world. A no-op beyond a log
    /// line today — a caller wires the three inbound signals to
    /// `glucose_updated`/`pump_status_updated`/`carb_entries_updated`
    /// itself — but kept as the documented counterpart to `stop()` (§9).
    pub fn start(&self) {
        tracing::info!("loop engine started");
    }

    /// Releases the sentry task and the effect cache actor (§5, "Observer
    /// lifetime").
    pub async fn stop(&self) {
        self.ingress.cancel_pending_sentry().await;
        self.cache.stop_gracefully().await.ok();
        tracing::info!("loop engine stopped");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LoopEvent> {
        self.events.subscribe()
    }

    pub async fn glucose_updated(&self) {
        self.ingress.glucose_updated().await;
    }

    pub async fn pump_status_updated(&self) {
        self.ingress.pump_status_updated().await;
    }

    pub async fn carb_entries_updated(&self) {
        self.ingress.carb_entries_updated().await;
    }

    pub async fn add_carb_entry(&self, entry: CarbEntry) -> Result<f64, LoopError> {
        self.ingress.add_carb_entry(entry).await
    }

    pub async fn run_loop(&self) {
        self.pipeline.run_loop().await;
    }

    pub async fn get_status(&self) -> StatusSnapshot {
        self.pipeline.get_status().await
    }
}
