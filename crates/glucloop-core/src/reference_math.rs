//! A deliberately simple `PredictionMath`/`RecommendationMath` pair.
//!
//! This is **not** a clinical dosing algorithm. It exists so the crate is
//! runnable and testable end to end without a missing dependency; the real
//! math is out of scope per §1 and is expected to be swapped in by a
//! caller that owns the actual oref/FSRS-grade implementation.

use chrono::Utc;

use crate::domain::{
    ConfigurationSnapshot, EffectSeries, GlucoseSample, Prediction, PredictionPoint,
    Recommendation, TempBasal,
};
use crate::ports::{PredictionMath, RecommendationMath};

/// Sums momentum, carb, and insulin effects onto the latest glucose sample
/// at each distinct timestamp any effect reports.
pub struct LinearSumPredictionMath;

impl PredictionMath for LinearSumPredictionMath {
    fn predict(
        &self,
        latest_glucose: GlucoseSample,
        momentum: &EffectSeries,
        carbs: &EffectSeries,
        insulin: &EffectSeries,
    ) -> Prediction {
        let mut dates: Vec<_> = momentum
            .iter()
            .chain(carbs.iter())
            .chain(insulin.iter())
            .map(|p| p.date)
            .collect();
        dates.push(latest_glucose.date);
        dates.sort();
        dates.dedup();

        dates
            .into_iter()
            .map(|date| {
                let sum = |series: &EffectSeries| -> f64 {
                    series
                        .iter()
                        .filter(|p| p.date <= date)
                        .last()
                        .map(|p| p.delta_mg_dl)
                        .unwrap_or(0.0)
                };
                PredictionPoint {
                    date,
                    value_mg_dl: latest_glucose.value_mg_dl
                        + sum(momentum)
                        + sum(carbs)
                        + sum(insulin),
                }
            })
            .collect()
    }
}

/// Proportional controller: recommends a temp basal that nudges the final
/// predicted point toward the middle of the target range in effect "now".
pub struct ProportionalRecommendationMath;

impl RecommendationMath for ProportionalRecommendationMath {
    fn recommend_temp_basal(
        &self,
        prediction: &Prediction,
        _last_temp_basal: Option<TempBasal>,
        config: &ConfigurationSnapshot,
        allow_predictive_low: bool,
    ) -> Option<Recommendation> {
        let last = prediction.last()?;
        let now = Utc::now();
        let range = config.target_range_schedule.value_at(now.time());
        let sensitivity = *config.sensitivity_schedule.value_at(now.time());
        let scheduled_basal = *config.basal_schedule.value_at(now.time());

        let midpoint = (range.min_mg_dl + range.max_mg_dl) / 2.0;
        let deviation = last.value_mg_dl - midpoint;

        if !allow_predictive_low && last.value_mg_dl < range.min_mg_dl {
            return None;
        }
        if deviation.abs() < f64::EPSILON {
            return None;
        }

        let correction = deviation / sensitivity;
        let rate = (scheduled_basal - correction)
            .clamp(0.0, config.max_basal_units_per_hour);

        Some(Recommendation {
            issued_at: now,
            rate_units_per_hour: rate,
            duration: chrono::Duration::minutes(30),
        })
    }

    fn recommend_bolus(&self, prediction: &Prediction, config: &ConfigurationSnapshot) -> f64 {
        let Some(last) = prediction.last() else {
            return 0.0;
        };
        let now = Utc::now();
        let range = config.target_range_schedule.value_at(now.time());
        let sensitivity = *config.sensitivity_schedule.value_at(now.time());

        let deviation = last.value_mg_dl - range.max_mg_dl;
        if deviation <= 0.0 {
            return 0.0;
        }
        (deviation / sensitivity).clamp(0.0, config.max_bolus_units)
    }
}
