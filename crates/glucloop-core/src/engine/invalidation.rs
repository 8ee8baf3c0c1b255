//! The invalidation graph (§4.B) as an explicit state-transition function,
//! rather than as side effects scattered across property setters, per the
//! design note in §9. Every mutation path in `cache_actor` funnels through
//! exactly one of these so the cascade is easy to audit and unit-test in
//! isolation from the actor mailbox.

use chrono::{DateTime, Utc};

use super::state::EngineState;
use crate::domain::{BolusRecord, EffectSeries, Prediction, Recommendation, BOLUS_RETENTION_WINDOW};

/// Assigning prediction clears recommendation (§4.B).
fn clear_prediction(state: &mut EngineState) {
    state.prediction = None;
    state.recommendation = None;
}

/// Assigns `momentum`, cascading to prediction and recommendation.
pub fn set_momentum(state: &mut EngineState, value: Option<EffectSeries>) {
    state.momentum = value;
    clear_prediction(state);
}

/// Assigns `carbs`, cascading to prediction and recommendation.
pub fn set_carbs(state: &mut EngineState, value: Option<EffectSeries>) {
    state.carbs = value;
    clear_prediction(state);
}

/// Assigns `insulin`, cascading to prediction and recommendation, and
/// additionally clearing a stale `last_bolus` (§4.B).
pub fn set_insulin(state: &mut EngineState, value: Option<EffectSeries>, now: DateTime<Utc>) {
    state.insulin = value;
    clear_prediction(state);

    if let Some(bolus) = state.last_bolus {
        if now - bolus.enacted_at >= BOLUS_RETENTION_WINDOW {
            state.last_bolus = None;
        }
    }
}

/// Assigns `prediction`, cascading to recommendation.
pub fn set_prediction(state: &mut EngineState, value: Option<Prediction>) {
    state.prediction = value;
    state.recommendation = None;
}

/// Assigns `recommendation` directly; nothing downstream depends on it.
pub fn set_recommendation(state: &mut EngineState, value: Option<Recommendation>) {
    state.recommendation = value;
}

/// Records a successful temp-basal enactment: the recommendation it
/// consumed is cleared in the same step (§4.F step 5, §8 invariant 6).
pub fn record_temp_basal_enactment(
    state: &mut EngineState,
    temp_basal: crate::domain::TempBasal,
) {
    state.last_temp_basal = Some(temp_basal);
    state.recommendation = None;
}

/// Records a successful bolus enactment.
pub fn record_bolus_enactment(state: &mut EngineState, bolus: BolusRecord) {
    state.last_bolus = Some(bolus);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EffectPoint;
    use chrono::TimeZone;

    fn sample_series(now: DateTime<Utc>) -> EffectSeries {
        vec![EffectPoint {
            date: now,
            delta_mg_dl: 1.0,
        }]
    }

    fn some_recommendation(now: DateTime<Utc>) -> Recommendation {
        Recommendation {
            issued_at: now,
            rate_units_per_hour: 0.5,
            duration: chrono::Duration::minutes(30),
        }
    }

    fn some_prediction(now: DateTime<Utc>) -> Prediction {
        vec![crate::domain::PredictionPoint {
            date: now,
            value_mg_dl: 120.0,
        }]
    }

    #[test]
    fn assigning_any_effect_clears_prediction_and_recommendation() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut state = EngineState {
            prediction: Some(some_prediction(now)),
            recommendation: Some(some_recommendation(now)),
            ..Default::default()
        };

        set_momentum(&mut state, Some(sample_series(now)));

        assert!(state.prediction.is_none());
        assert!(state.recommendation.is_none());
    }

    #[test]
    fn assigning_prediction_clears_recommendation_only() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut state = EngineState {
            momentum: Some(sample_series(now)),
            recommendation: Some(some_recommendation(now)),
            ..Default::default()
        };

        set_prediction(&mut state, Some(some_prediction(now)));

        assert!(state.prediction.is_some());
        assert!(state.recommendation.is_none());
        assert!(state.momentum.is_some());
    }

    #[test]
    fn reassigning_insulin_clears_bolus_older_than_five_minutes() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 10, 0).unwrap();
        let bolus_time = now - chrono::Duration::minutes(5);
        let mut state = EngineState {
            last_bolus: Some(BolusRecord {
                units: 2.0,
                enacted_at: bolus_time,
            }),
            ..Default::default()
        };

        set_insulin(&mut state, Some(sample_series(now)), now);

        assert!(state.last_bolus.is_none());
    }

    #[test]
    fn reassigning_insulin_keeps_bolus_younger_than_five_minutes() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 4, 59).unwrap();
        let bolus_time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut state = EngineState {
            last_bolus: Some(BolusRecord {
                units: 2.0,
                enacted_at: bolus_time,
            }),
            ..Default::default()
        };

        set_insulin(&mut state, Some(sample_series(now)), now);

        assert!(state.last_bolus.is_some());
    }

    #[test]
    fn successful_temp_basal_enactment_clears_recommendation() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut state = EngineState {
            recommendation: Some(some_recommendation(now)),
            ..Default::default()
        };

        record_temp_basal_enactment(
            &mut state,
            crate::domain::TempBasal {
                start: now,
                end: now + chrono::Duration::minutes(30),
                rate_units_per_hour: 0.8,
            },
        );

        assert!(state.recommendation.is_none());
        assert_eq!(state.last_temp_basal.unwrap().rate_units_per_hour, 0.8);
    }

    /// §8 invariants 1-2, checked against arbitrary sequences of the five
    /// mutating operations rather than a handful of hand-picked cases.
    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone, Copy)]
        enum Op {
            SetMomentum,
            SetCarbs,
            SetInsulin,
            // Models the pipeline's real call pattern (§4.D step 6-7): a
            // recommendation is only ever produced alongside a prediction
            // in the same settle, never set on its own.
            SetPredictionWithRecommendation,
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                Just(Op::SetMomentum),
                Just(Op::SetCarbs),
                Just(Op::SetInsulin),
                Just(Op::SetPredictionWithRecommendation),
            ]
        }

        proptest! {
            #[test]
            fn effect_and_prediction_invariants_hold_after_any_sequence(ops in prop::collection::vec(op_strategy(), 0..50)) {
                let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
                let mut state = EngineState::default();

                for op in ops {
                    match op {
                        Op::SetMomentum => set_momentum(&mut state, Some(sample_series(now))),
                        Op::SetCarbs => set_carbs(&mut state, Some(sample_series(now))),
                        Op::SetInsulin => set_insulin(&mut state, Some(sample_series(now)), now),
                        Op::SetPredictionWithRecommendation => {
                            set_prediction(&mut state, Some(some_prediction(now)));
                            set_recommendation(&mut state, Some(some_recommendation(now)));
                        }
                    }

                    // Invariant 1: any missing effect implies no prediction.
                    if state.momentum.is_none() || state.carbs.is_none() || state.insulin.is_none() {
                        prop_assert!(state.prediction.is_none());
                    }
                    // Invariant 2: no prediction implies no recommendation.
                    if state.prediction.is_none() {
                        prop_assert!(state.recommendation.is_none());
                    }
                }
            }
        }
    }
}
