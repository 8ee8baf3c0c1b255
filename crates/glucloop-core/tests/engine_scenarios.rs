//! End-to-end scenarios and round-trip properties against the assembled
//! `LoopEngine`, driven entirely through mocked collaborators — the six
//! literal scenarios and two idempotence properties.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};

use glucloop_core::domain::{CarbEntry, LoopError, PumpStatus, Recommendation};
use glucloop_core::ports::{MockDoseStore, MockPredictionMath, MockRecommendationMath};
use glucloop_core::testing::fixtures::{
    carb_store_succeeding, config_provider_with_dosing, dose_store_succeeding,
    glucose_sample_at, glucose_store_reporting, prediction_at, pump_status_reporting,
    ready_pump_device,
};
use glucloop_core::{Collaborators, LoopEngine, LoopEvent};

fn recommend_fixed(rate: f64, minutes: i64) -> MockRecommendationMath {
    let mut math = MockRecommendationMath::new();
    math.expect_recommend_temp_basal().returning(move |_, _, _, _| {
        Some(Recommendation {
            issued_at: Utc::now(),
            rate_units_per_hour: rate,
            duration: Duration::minutes(minutes),
        })
    });
    math.expect_recommend_bolus().returning(|_, _| 0.0);
    math
}

fn predicting(value_mg_dl: f64) -> MockPredictionMath {
    let mut math = MockPredictionMath::new();
    math.expect_predict()
        .returning(move |glucose, _, _, _| prediction_at(glucose.date, value_mg_dl));
    math
}

/// Scenario 1: happy path, dosing on.
#[tokio::test]
async fn happy_path_dosing_on_enacts_temp_basal() {
    let now = Utc::now();
    let collaborators = Collaborators {
        glucose_store: Some(Arc::new(glucose_store_reporting(glucose_sample_at(now, 120.0)))),
        carb_store: Some(Arc::new(carb_store_succeeding())),
        dose_store: Some(Arc::new(dose_store_succeeding())),
        pump_status: Arc::new(pump_status_reporting(PumpStatus {
            date: now,
            time_remaining_on_temp: Duration::zero(),
        })),
        pump: Arc::new(ready_pump_device()),
        config: Arc::new(config_provider_with_dosing(true)),
        prediction_math: Arc::new(predicting(120.0)),
        recommendation_math: Arc::new(recommend_fixed(0.8, 30)),
    };

    let engine = LoopEngine::new(collaborators);
    let mut events = engine.subscribe();

    engine.run_loop().await;

    let status = engine.get_status().await;
    assert!(status.last_loop_error.is_none());
    assert!(status.recommendation.is_none(), "enactment clears the recommendation");
    let temp_basal = status.last_temp_basal.expect("temp basal was enacted");
    assert_eq!(temp_basal.rate_units_per_hour, 0.8);
    assert_eq!(temp_basal.end - temp_basal.start, Duration::minutes(30));

    // Exactly one LoopDataUpdated, emitted after the gate settles.
    let mut data_updates = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, LoopEvent::LoopDataUpdated) {
            data_updates += 1;
        }
    }
    assert_eq!(data_updates, 1);
}

/// Scenario 2: stale glucose.
#[tokio::test]
async fn stale_glucose_fails_update_without_enacting() {
    let now = Utc::now();
    let stale = now - Duration::minutes(16);
    let collaborators = Collaborators {
        glucose_store: Some(Arc::new(glucose_store_reporting(glucose_sample_at(stale, 120.0)))),
        carb_store: Some(Arc::new(carb_store_succeeding())),
        dose_store: Some(Arc::new(dose_store_succeeding())),
        pump_status: Arc::new(pump_status_reporting(PumpStatus {
            date: now,
            time_remaining_on_temp: Duration::zero(),
        })),
        pump: Arc::new(ready_pump_device()),
        config: Arc::new(config_provider_with_dosing(true)),
        prediction_math: Arc::new(predicting(120.0)),
        recommendation_math: Arc::new(recommend_fixed(0.8, 30)),
    };

    let engine = LoopEngine::new(collaborators);
    engine.run_loop().await;

    let status = engine.get_status().await;
    assert!(matches!(status.last_loop_error, Some(LoopError::StaleData(_))));
    assert!(status.prediction.is_none());
    assert!(status.last_temp_basal.is_none());
}

/// Scenario 3: missing insulin effect (dose store errors).
#[tokio::test]
async fn dose_store_failure_yields_missing_effect_data_error() {
    let now = Utc::now();
    let mut dose_store = MockDoseStore::new();
    dose_store
        .expect_get_glucose_effects()
        .returning(|_| Err(LoopError::CommunicationError("dose store unreachable".into())));

    let collaborators = Collaborators {
        glucose_store: Some(Arc::new(glucose_store_reporting(glucose_sample_at(now, 120.0)))),
        carb_store: Some(Arc::new(carb_store_succeeding())),
        dose_store: Some(Arc::new(dose_store)),
        pump_status: Arc::new(pump_status_reporting(PumpStatus {
            date: now,
            time_remaining_on_temp: Duration::zero(),
        })),
        pump: Arc::new(ready_pump_device()),
        config: Arc::new(config_provider_with_dosing(true)),
        prediction_math: Arc::new(predicting(120.0)),
        recommendation_math: Arc::new(recommend_fixed(0.8, 30)),
    };

    let engine = LoopEngine::new(collaborators);
    engine.run_loop().await;

    let status = engine.get_status().await;
    match status.last_loop_error {
        Some(LoopError::MissingData(detail)) => {
            assert_eq!(detail, "Cannot predict glucose due to missing effect data");
        }
        other => panic!("expected MissingData, got {other:?}"),
    }
    assert!(status.last_temp_basal.is_none());
}

/// Scenario 4: pump-status tick with the sentry quiet window.
#[tokio::test(start_paused = true)]
async fn pump_status_update_waits_out_the_sentry_window() {
    let now = Utc::now();
    let collaborators = Collaborators {
        glucose_store: Some(Arc::new(glucose_store_reporting(glucose_sample_at(now, 120.0)))),
        carb_store: Some(Arc::new(carb_store_succeeding())),
        dose_store: Some(Arc::new(dose_store_succeeding())),
        pump_status: Arc::new(pump_status_reporting(PumpStatus {
            date: now,
            time_remaining_on_temp: Duration::zero(),
        })),
        pump: Arc::new(ready_pump_device()),
        config: Arc::new(config_provider_with_dosing(false)),
        prediction_math: Arc::new(predicting(120.0)),
        recommendation_math: Arc::new(recommend_fixed(0.8, 30)),
    };

    let engine = LoopEngine::new(collaborators);
    let mut events = engine.subscribe();

    engine.pump_status_updated().await;
    assert!(matches!(events.recv().await.unwrap(), LoopEvent::LoopRunning));

    // No settle yet: the sentry task is still sleeping.
    assert!(events.try_recv().is_err());

    tokio::time::advance(StdDuration::from_secs(11) + StdDuration::from_millis(100)).await;

    // The sentry task wakes, fires the tick, and settles exactly once.
    assert!(matches!(events.recv().await.unwrap(), LoopEvent::LoopDataUpdated));
    assert!(events.try_recv().is_err());
}

/// Scenario 5 (cache-population half): a fresh recommendation is computed
/// and cached when dosing is disabled. The aging-out half of this
/// scenario — enactment refused once the recommendation passes the
/// freshness window — needs a recommendation stamped in the past, which
/// only `DosingGate`'s own seam can set up without waiting 5 real
/// minutes; see `dosing_gate::tests::stale_recommendation_is_not_dispatched`.
#[tokio::test]
async fn dosing_disabled_still_caches_a_fresh_recommendation() {
    let now = Utc::now();
    let collaborators = Collaborators {
        glucose_store: Some(Arc::new(glucose_store_reporting(glucose_sample_at(now, 120.0)))),
        carb_store: Some(Arc::new(carb_store_succeeding())),
        dose_store: Some(Arc::new(dose_store_succeeding())),
        pump_status: Arc::new(pump_status_reporting(PumpStatus {
            date: now,
            time_remaining_on_temp: Duration::zero(),
        })),
        pump: Arc::new(ready_pump_device()),
        config: Arc::new(config_provider_with_dosing(false)),
        prediction_math: Arc::new(predicting(120.0)),
        recommendation_math: Arc::new(recommend_fixed(0.8, 30)),
    };

    let engine = LoopEngine::new(collaborators);
    engine.run_loop().await;
    let status = engine.get_status().await;
    assert!(status.recommendation.is_some());
    assert!(status.last_temp_basal.is_none(), "dosing disabled never enacts");
}

/// Scenario 6 (no pending bolus case): `add_carb_entry` surfaces the full
/// bolus math result when nothing is outstanding. The pending-bolus
/// subtraction and clamping itself is exercised directly against
/// `DosingGate` in `dosing_gate::tests`, since seeding `last_bolus`
/// requires the cache actor's private message set.
#[tokio::test]
async fn add_carb_entry_recommends_the_full_bolus_with_nothing_pending() {
    let now = Utc::now();
    let mut recommendation_math = MockRecommendationMath::new();
    recommendation_math
        .expect_recommend_temp_basal()
        .returning(|_, _, _, _| None);
    recommendation_math
        .expect_recommend_bolus()
        .returning(|_, _| 4.5);

    let collaborators = Collaborators {
        glucose_store: Some(Arc::new(glucose_store_reporting(glucose_sample_at(now, 120.0)))),
        carb_store: Some(Arc::new(carb_store_succeeding())),
        dose_store: Some(Arc::new(dose_store_succeeding())),
        pump_status: Arc::new(pump_status_reporting(PumpStatus {
            date: now,
            time_remaining_on_temp: Duration::zero(),
        })),
        pump: Arc::new(ready_pump_device()),
        config: Arc::new(config_provider_with_dosing(false)),
        prediction_math: Arc::new(predicting(120.0)),
        recommendation_math: Arc::new(recommendation_math),
    };

    let engine = LoopEngine::new(collaborators);
    let entry = CarbEntry {
        date: now,
        grams: 20.0,
        absorption_time: Duration::hours(3),
    };
    let recommended = engine.add_carb_entry(entry).await.unwrap();
    assert_eq!(recommended, 4.5);
}

/// Round-trip: two consecutive `get_status()` calls with no intervening
/// event return identical values.
#[tokio::test]
async fn repeated_status_reads_are_idempotent() {
    let now = Utc::now();
    let collaborators = Collaborators {
        glucose_store: Some(Arc::new(glucose_store_reporting(glucose_sample_at(now, 120.0)))),
        carb_store: Some(Arc::new(carb_store_succeeding())),
        dose_store: Some(Arc::new(dose_store_succeeding())),
        pump_status: Arc::new(pump_status_reporting(PumpStatus {
            date: now,
            time_remaining_on_temp: Duration::zero(),
        })),
        pump: Arc::new(ready_pump_device()),
        config: Arc::new(config_provider_with_dosing(false)),
        prediction_math: Arc::new(predicting(120.0)),
        recommendation_math: Arc::new(recommend_fixed(0.8, 30)),
    };

    let engine = LoopEngine::new(collaborators);
    let first = engine.get_status().await;
    let second = engine.get_status().await;

    assert_eq!(first.prediction, second.prediction);
    assert_eq!(first.recommendation, second.recommendation);
}

/// Round-trip: `run_loop()` with dosing disabled and fresh inputs is
/// idempotent on the Effect Cache.
#[tokio::test]
async fn run_loop_with_dosing_disabled_is_idempotent() {
    let now = Utc::now();
    let collaborators = Collaborators {
        glucose_store: Some(Arc::new(glucose_store_reporting(glucose_sample_at(now, 120.0)))),
        carb_store: Some(Arc::new(carb_store_succeeding())),
        dose_store: Some(Arc::new(dose_store_succeeding())),
        pump_status: Arc::new(pump_status_reporting(PumpStatus {
            date: now,
            time_remaining_on_temp: Duration::zero(),
        })),
        pump: Arc::new(ready_pump_device()),
        config: Arc::new(config_provider_with_dosing(false)),
        prediction_math: Arc::new(predicting(120.0)),
        recommendation_math: Arc::new(recommend_fixed(0.8, 30)),
    };

    let engine = LoopEngine::new(collaborators);
    engine.run_loop().await;
    let first = engine.get_status().await;
    engine.run_loop().await;
    let second = engine.get_status().await;

    assert_eq!(first.prediction, second.prediction);
    assert_eq!(first.recommendation, second.recommendation);
    assert_eq!(first.last_temp_basal, second.last_temp_basal);
}
