use async_trait::async_trait;

use crate::domain::{CarbEntry, EffectSeries, LoopError};

/// The carbohydrate store: out of scope per §1, consumed here only through
/// this seam.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CarbStore: Send + Sync {
    /// Modeled glucose rise from outstanding carbohydrate absorption,
    /// anchored at `start_after`.
    async fn get_glucose_effects(
        &self,
        start_after: chrono::DateTime<chrono::Utc>,
    ) -> Result<EffectSeries, LoopError>;

    /// Records a new carb entry.
    async fn add_carb_entry(&self, entry: CarbEntry) -> Result<(), LoopError>;
}
