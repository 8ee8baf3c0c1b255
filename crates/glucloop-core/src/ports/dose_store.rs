use async_trait::async_trait;

use crate::domain::{EffectSeries, LoopError};

/// The insulin dose store: out of scope per §1, consumed here only through
/// this seam.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DoseStore: Send + Sync {
    /// Modeled glucose suppression from outstanding insulin activity,
    /// anchored at `start_after`.
    async fn get_glucose_effects(
        &self,
        start_after: chrono::DateTime<chrono::Utc>,
    ) -> Result<EffectSeries, LoopError>;
}
