//! The Effect Cache (§4.A), implemented as a `kameo` actor whose mailbox
//! *is* the serial access discipline required by §5 — grounded in the
//! teacher's `PackCacheActor` (one `kameo::Actor` with one `Message<T>`
//! impl per cache operation).

use chrono::{DateTime, Utc};
use kameo::Actor;
use kameo::message::{Context, Message};

use super::invalidation;
use super::state::{EngineState, MissingEffects, StatusSnapshot};
use crate::domain::{BolusRecord, EffectSeries, LoopError, Prediction, Recommendation, TempBasal};

#[derive(Actor, Default)]
pub struct EffectCacheActor {
    state: EngineState,
}

impl EffectCacheActor {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct SetMomentum(pub Option<EffectSeries>);
pub struct SetCarbs(pub Option<EffectSeries>);
pub struct SetInsulin(pub Option<EffectSeries>);
pub struct SetPrediction(pub Option<Prediction>);
pub struct SetRecommendation(pub Option<Recommendation>);
pub struct RecordTempBasalEnactment(pub TempBasal);
pub struct RecordBolusEnactment(pub BolusRecord);
pub struct SetLastLoopError(pub Option<LoopError>);
pub struct SetLastLoopCompleted(pub DateTime<Utc>);
pub struct SetWaitingForSentry(pub bool);

/// Clears `waiting_for_sentry` and `insulin` together, as issued by the
/// delayed post-sentry task (§4.E).
pub struct SentryFired;

pub struct GetWaitingForSentry;
pub struct GetMissingEffects;
pub struct GetStatus;
pub struct GetState;

impl Message<SetMomentum> for EffectCacheActor {
    type Reply = ();
    async fn handle(&mut self, msg: SetMomentum, _ctx: &mut Context<Self, Self::Reply>) {
        invalidation::set_momentum(&mut self.state, msg.0);
    }
}

impl Message<SetCarbs> for EffectCacheActor {
    type Reply = ();
    async fn handle(&mut self, msg: SetCarbs, _ctx: &mut Context<Self, Self::Reply>) {
        invalidation::set_carbs(&mut self.state, msg.0);
    }
}

impl Message<SetInsulin> for EffectCacheActor {
    type Reply = ();
    async fn handle(&mut self, msg: SetInsulin, _ctx: &mut Context<Self, Self::Reply>) {
        invalidation::set_insulin(&mut self.state, msg.0, Utc::now());
    }
}

impl Message<SetPrediction> for EffectCacheActor {
    type Reply = ();
    async fn handle(&mut self, msg: SetPrediction, _ctx: &mut Context<Self, Self::Reply>) {
        invalidation::set_prediction(&mut self.state, msg.0);
    }
}

impl Message<SetRecommendation> for EffectCacheActor {
    type Reply = ();
    async fn handle(&mut self, msg: SetRecommendation, _ctx: &mut Context<Self, Self::Reply>) {
        invalidation::set_recommendation(&mut self.state, msg.0);
    }
}

impl Message<RecordTempBasalEnactment> for EffectCacheActor {
    type Reply = ();
    async fn handle(
        &mut self,
        msg: RecordTempBasalEnactment,
        _ctx: &mut Context<Self, Self::Reply>,
    ) {
        invalidation::record_temp_basal_enactment(&mut self.state, msg.0);
    }
}

impl Message<RecordBolusEnactment> for EffectCacheActor {
    type Reply = ();
    async fn handle(&mut self, msg: RecordBolusEnactment, _ctx: &mut Context<Self, Self::Reply>) {
        invalidation::record_bolus_enactment(&mut self.state, msg.0);
    }
}

impl Message<SetLastLoopError> for EffectCacheActor {
    type Reply = ();
    async fn handle(&mut self, msg: SetLastLoopError, _ctx: &mut Context<Self, Self::Reply>) {
        self.state.last_loop_error = msg.0;
    }
}

impl Message<SetLastLoopCompleted> for EffectCacheActor {
    type Reply = ();
    async fn handle(&mut self, msg: SetLastLoopCompleted, _ctx: &mut Context<Self, Self::Reply>) {
        self.state.last_loop_completed = Some(msg.0);
    }
}

impl Message<SetWaitingForSentry> for EffectCacheActor {
    type Reply = ();
    async fn handle(&mut self, msg: SetWaitingForSentry, _ctx: &mut Context<Self, Self::Reply>) {
        self.state.waiting_for_sentry = msg.0;
    }
}

impl Message<SentryFired> for EffectCacheActor {
    type Reply = ();
    async fn handle(&mut self, _msg: SentryFired, _ctx: &mut Context<Self, Self::Reply>) {
        self.state.waiting_for_sentry = false;
        invalidation::set_insulin(&mut self.state, None, Utc::now());
    }
}

impl Message<GetWaitingForSentry> for EffectCacheActor {
    type Reply = bool;
    async fn handle(&mut self, _msg: GetWaitingForSentry, _ctx: &mut Context<Self, Self::Reply>) -> bool {
        self.state.waiting_for_sentry
    }
}

impl Message<GetMissingEffects> for EffectCacheActor {
    type Reply = MissingEffects;
    async fn handle(
        &mut self,
        _msg: GetMissingEffects,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> MissingEffects {
        MissingEffects {
            momentum: self.state.momentum.is_none(),
            carbs: self.state.carbs.is_none(),
            insulin: self.state.insulin.is_none(),
        }
    }
}

impl Message<GetStatus> for EffectCacheActor {
    type Reply = StatusSnapshot;
    async fn handle(&mut self, _msg: GetStatus, _ctx: &mut Context<Self, Self::Reply>) -> StatusSnapshot {
        StatusSnapshot::from(&self.state)
    }
}

impl Message<GetState> for EffectCacheActor {
    type Reply = EngineState;
    async fn handle(&mut self, _msg: GetState, _ctx: &mut Context<Self, Self::Reply>) -> EngineState {
        self.state.clone()
    }
}
