//! Reusable test fixtures: sample glucose/effect/configuration data plus
//! mock setup helpers for the common "everything is fresh and succeeds"
//! shape used by most end-to-end scenarios.

use chrono::{DateTime, Utc};

use crate::domain::{
    ConfigurationSnapshot, DailySchedule, EffectPoint, EffectSeries, GlucoseSample,
    GlucoseTargetRange, Prediction, PredictionPoint, PumpStatus, TempBasalAck,
};
use crate::ports::{
    MockCarbStore, MockConfigProvider, MockDoseStore, MockGlucoseStore, MockPumpDevice,
    MockPumpStatusProvider,
};

pub fn glucose_sample_at(when: DateTime<Utc>, value_mg_dl: f64) -> GlucoseSample {
    GlucoseSample {
        date: when,
        value_mg_dl,
        source: "dexcom".to_string(),
    }
}

pub fn flat_effect_series(when: DateTime<Utc>) -> EffectSeries {
    vec![EffectPoint {
        date: when,
        delta_mg_dl: 0.0,
    }]
}

pub fn constant_target_range() -> GlucoseTargetRange {
    GlucoseTargetRange {
        min_mg_dl: 70.0,
        max_mg_dl: 140.0,
    }
}

pub fn default_config_snapshot() -> ConfigurationSnapshot {
    ConfigurationSnapshot {
        max_basal_units_per_hour: 3.0,
        max_bolus_units: 5.0,
        target_range_schedule: DailySchedule::constant(constant_target_range()),
        sensitivity_schedule: DailySchedule::constant(50.0),
        basal_schedule: DailySchedule::constant(1.0),
    }
}

pub fn prediction_at(when: DateTime<Utc>, value_mg_dl: f64) -> Prediction {
    vec![PredictionPoint { date: when, value_mg_dl }]
}

/// A `MockGlucoseStore` that reports `sample` as latest and succeeds the
/// momentum refresh with a flat effect.
pub fn glucose_store_reporting(sample: GlucoseSample) -> MockGlucoseStore {
    let mut mock = MockGlucoseStore::new();
    mock.expect_latest_glucose()
        .returning(move || Some(sample.clone()));
    mock.expect_get_recent_momentum_effect()
        .returning(|start_after| Ok(flat_effect_series(start_after)));
    mock
}

/// A `MockCarbStore` whose refresh and entry recording always succeed.
pub fn carb_store_succeeding() -> MockCarbStore {
    let mut mock = MockCarbStore::new();
    mock.expect_get_glucose_effects()
        .returning(|start_after| Ok(flat_effect_series(start_after)));
    mock.expect_add_carb_entry().returning(|_| Ok(()));
    mock
}

/// A `MockDoseStore` whose refresh always succeeds with a flat effect.
pub fn dose_store_succeeding() -> MockDoseStore {
    let mut mock = MockDoseStore::new();
    mock.expect_get_glucose_effects()
        .returning(|start_after| Ok(flat_effect_series(start_after)));
    mock
}

/// A `MockPumpStatusProvider` reporting `status` as the latest reading.
pub fn pump_status_reporting(status: PumpStatus) -> MockPumpStatusProvider {
    let mut mock = MockPumpStatusProvider::new();
    mock.expect_latest().returning(move || Some(status));
    mock
}

/// A `MockConfigProvider` with the default snapshot and the given
/// `dosingEnabled` value.
pub fn config_provider_with_dosing(dosing_enabled: bool) -> MockConfigProvider {
    let mut mock = MockConfigProvider::new();
    mock.expect_snapshot()
        .returning(|| Some(default_config_snapshot()));
    mock.expect_dosing_enabled()
        .returning(move || dosing_enabled);
    mock.expect_set_dosing_enabled().returning(|_| Ok(()));
    mock
}

/// A `MockPumpDevice` that is connected, ready, and acknowledges whatever
/// it's asked to dispatch.
pub fn ready_pump_device() -> MockPumpDevice {
    let mut mock = MockPumpDevice::new();
    mock.expect_is_connected().returning(|| true);
    mock.expect_has_command_channel().returning(|| true);
    mock.expect_set_temp_basal().returning(|rate, duration| {
        Ok(TempBasalAck {
            rate_units_per_hour: rate,
            time_remaining: duration,
        })
    });
    mock.expect_set_normal_bolus().returning(|_| Ok(()));
    mock.expect_last_tuned().returning(|| Some(Utc::now()));
    mock.expect_tune().returning(|| Ok(()));
    mock
}
