use async_trait::async_trait;

use crate::domain::{EffectSeries, GlucoseSample, LoopError};

/// The glucose store: out of scope per §1, consumed here only through this
/// seam.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait GlucoseStore: Send + Sync {
    /// The most recent glucose sample, if any has ever been recorded.
    async fn latest_glucose(&self) -> Option<GlucoseSample>;

    /// Short-horizon extrapolation of recent glucose slope, anchored at
    /// `start_after`.
    async fn get_recent_momentum_effect(
        &self,
        start_after: chrono::DateTime<chrono::Utc>,
    ) -> Result<EffectSeries, LoopError>;
}
