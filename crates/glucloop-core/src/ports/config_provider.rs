use async_trait::async_trait;

use crate::domain::ConfigurationSnapshot;

/// Therapy configuration, sourced externally and read once per decision
/// step (§9, "Configuration snapshotting"). Any field may be absent —
/// `snapshot()` returns `None` as soon as one is missing so the pipeline
/// can fail with a single `MissingData`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    async fn snapshot(&self) -> Option<ConfigurationSnapshot>;

    /// The persistent `dosingEnabled` user setting (§6).
    async fn dosing_enabled(&self) -> bool;

    /// Persists a new value for `dosingEnabled`. Implementations should
    /// treat this as the trigger point for a `LoopDataUpdated` signal one
    /// layer up (§6).
    async fn set_dosing_enabled(&self, enabled: bool) -> anyhow::Result<()>;
}
