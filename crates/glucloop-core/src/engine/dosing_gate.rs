//! The Dosing Gate (§4.F): the only component permitted to dispatch a
//! command to the pump device.

use std::sync::Arc;

use chrono::Utc;
use kameo::actor::ActorRef;

use super::cache_actor::{EffectCacheActor, GetState, RecordBolusEnactment, RecordTempBasalEnactment};
use crate::domain::{BolusRecord, LoopError, TempBasal, RECENCY_INTERVAL, RECOMMENDATION_FRESHNESS};
use crate::ports::{ConfigProvider, PumpDevice, RecommendationMath};

pub struct DosingGate {
    cache: ActorRef<EffectCacheActor>,
    pump: Arc<dyn PumpDevice>,
    config: Arc<dyn ConfigProvider>,
    recommendation_math: Arc<dyn RecommendationMath>,
}

impl DosingGate {
    pub fn new(
        cache: ActorRef<EffectCacheActor>,
        pump: Arc<dyn PumpDevice>,
        config: Arc<dyn ConfigProvider>,
        recommendation_math: Arc<dyn RecommendationMath>,
    ) -> Self {
        Self {
            cache,
            pump,
            config,
            recommendation_math,
        }
    }

    async fn ensure_device_ready(&self) -> Result<(), LoopError> {
        if !self.pump.is_connected().await {
            return Err(LoopError::ConnectionError("no pump connected".into()));
        }
        if !self.pump.has_command_channel().await {
            return Err(LoopError::ConfigurationError(
                "pump has no configured command channel".into(),
            ));
        }
        Ok(())
    }

    /// §4.F "Temp-basal enactment".
    pub async fn set_recommended_temp_basal(&self) -> Result<(), LoopError> {
        let state = self
            .cache
            .ask(GetState)
            .await
            .expect("effect cache actor unavailable");

        let recommendation = match state.recommendation {
            None => return Ok(()),
            Some(recommendation) => recommendation,
        };

        let now = Utc::now();
        if now - recommendation.issued_at >= RECOMMENDATION_FRESHNESS {
            return Err(LoopError::StaleData(format!(
                "recommendation issued at {} exceeds the freshness window",
                recommendation.issued_at
            )));
        }

        self.ensure_device_ready().await?;

        let ack = self
            .pump
            .set_temp_basal(recommendation.rate_units_per_hour, recommendation.duration)
            .await?;

        let end = now + ack.time_remaining;
        let start = end - recommendation.duration;
        let temp_basal = TempBasal {
            start,
            end,
            rate_units_per_hour: ack.rate_units_per_hour,
        };

        self.cache
            .tell(RecordTempBasalEnactment(temp_basal))
            .await
            .expect("effect cache actor unavailable");
        Ok(())
    }

    /// §4.F "Bolus recommendation".
    pub async fn recommend_bolus(&self) -> Result<f64, LoopError> {
        let state = self
            .cache
            .ask(GetState)
            .await
            .expect("effect cache actor unavailable");

        let prediction = state
            .prediction
            .clone()
            .ok_or_else(|| LoopError::MissingData("no prediction available".into()))?;
        let config = self
            .config
            .snapshot()
            .await
            .ok_or_else(|| LoopError::MissingData("configuration snapshot incomplete".into()))?;

        let first_point = prediction
            .first()
            .ok_or_else(|| LoopError::MissingData("prediction is empty".into()))?;
        if Utc::now() - first_point.date > RECENCY_INTERVAL {
            return Err(LoopError::StaleData(format!(
                "prediction anchored at {} exceeds the recency interval",
                first_point.date
            )));
        }

        let raw = self.recommendation_math.recommend_bolus(&prediction, &config);
        let pending = state.last_bolus.map(|bolus| bolus.units).unwrap_or(0.0);
        Ok((raw - pending).max(0.0))
    }

    /// §4.F "Bolus enactment".
    pub async fn enact_bolus(&self, units: f64) -> Result<(), LoopError> {
        if units <= 0.0 {
            return Ok(());
        }

        self.ensure_device_ready().await?;

        self.pump
            .set_normal_bolus(units)
            .await
            .map_err(|err| LoopError::CommunicationError(err.to_string()))?;

        self.cache
            .tell(RecordBolusEnactment(BolusRecord {
                units,
                enacted_at: Utc::now(),
            }))
            .await
            .expect("effect cache actor unavailable");
        Ok(())
    }
}
