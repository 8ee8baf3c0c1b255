//! In-memory stand-ins for the collaborators that are out of scope for
//! this crate (§1): a real deployment plugs in an actual CGM store, carb
//! log, insulin-on-board model, and pump radio here instead.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use glucloop_core::domain::{CarbEntry, EffectPoint, EffectSeries, GlucoseSample, LoopError, PumpStatus, TempBasalAck};
use glucloop_core::ports::{CarbStore, DoseStore, GlucoseStore, PumpDevice, PumpStatusProvider};

fn flat(start_after: chrono::DateTime<Utc>) -> EffectSeries {
    vec![EffectPoint {
        date: start_after,
        delta_mg_dl: 0.0,
    }]
}

pub struct DemoGlucoseStore {
    value_mg_dl: Mutex<f64>,
}

impl DemoGlucoseStore {
    pub fn new(value_mg_dl: f64) -> Self {
        Self {
            value_mg_dl: Mutex::new(value_mg_dl),
        }
    }
}

#[async_trait]
impl GlucoseStore for DemoGlucoseStore {
    async fn latest_glucose(&self) -> Option<GlucoseSample> {
        Some(GlucoseSample {
            date: Utc::now(),
            value_mg_dl: *self.value_mg_dl.lock().unwrap(),
            source: "demo-cgm".to_string(),
        })
    }

    async fn get_recent_momentum_effect(
        &self,
        start_after: chrono::DateTime<Utc>,
    ) -> Result<EffectSeries, LoopError> {
        Ok(flat(start_after))
    }
}

#[derive(Default)]
pub struct DemoCarbStore {
    entries: Mutex<Vec<CarbEntry>>,
}

#[async_trait]
impl CarbStore for DemoCarbStore {
    async fn get_glucose_effects(
        &self,
        start_after: chrono::DateTime<Utc>,
    ) -> Result<EffectSeries, LoopError> {
        Ok(flat(start_after))
    }

    async fn add_carb_entry(&self, entry: CarbEntry) -> Result<(), LoopError> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

pub struct DemoDoseStore;

#[async_trait]
impl DoseStore for DemoDoseStore {
    async fn get_glucose_effects(
        &self,
        start_after: chrono::DateTime<Utc>,
    ) -> Result<EffectSeries, LoopError> {
        Ok(flat(start_after))
    }
}

pub struct DemoPumpStatusProvider;

#[async_trait]
impl PumpStatusProvider for DemoPumpStatusProvider {
    async fn latest(&self) -> Option<PumpStatus> {
        Some(PumpStatus {
            date: Utc::now(),
            time_remaining_on_temp: chrono::Duration::zero(),
        })
    }
}

pub struct DemoPumpDevice;

#[async_trait]
impl PumpDevice for DemoPumpDevice {
    async fn is_connected(&self) -> bool {
        true
    }

    async fn has_command_channel(&self) -> bool {
        true
    }

    async fn set_temp_basal(
        &self,
        rate_units_per_hour: f64,
        duration: chrono::Duration,
    ) -> Result<TempBasalAck, LoopError> {
        Ok(TempBasalAck {
            rate_units_per_hour,
            time_remaining: duration,
        })
    }

    async fn set_normal_bolus(&self, _units: f64) -> Result<(), LoopError> {
        Ok(())
    }

    async fn last_tuned(&self) -> Option<chrono::DateTime<Utc>> {
        Some(Utc::now())
    }

    async fn tune(&self) -> Result<(), LoopError> {
        Ok(())
    }
}
