use crate::domain::{
    ConfigurationSnapshot, EffectSeries, GlucoseSample, Prediction, Recommendation, TempBasal,
};

/// Turns the latest glucose sample and the three effect series into a
/// forward-projected trajectory. Out of scope per §1 — the engine only
/// calls this seam, never reimplements the math.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PredictionMath: Send + Sync {
    fn predict(
        &self,
        latest_glucose: GlucoseSample,
        momentum: &EffectSeries,
        carbs: &EffectSeries,
        insulin: &EffectSeries,
    ) -> Prediction;
}

/// Turns a prediction into a dosing recommendation. Out of scope per §1.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait RecommendationMath: Send + Sync {
    /// `allow_predictive_low` is always `true` per §6; threaded through so
    /// the seam's signature matches the spec rather than baking the
    /// constant into the trait.
    #[allow(clippy::too_many_arguments)]
    fn recommend_temp_basal(
        &self,
        prediction: &Prediction,
        last_temp_basal: Option<TempBasal>,
        config: &ConfigurationSnapshot,
        allow_predictive_low: bool,
    ) -> Option<Recommendation>;

    fn recommend_bolus(&self, prediction: &Prediction, config: &ConfigurationSnapshot) -> f64;
}
