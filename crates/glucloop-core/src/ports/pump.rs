use async_trait::async_trait;

use crate::domain::{LoopError, PumpStatus, TempBasalAck};

/// The pump's status telemetry: out of scope per §1.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PumpStatusProvider: Send + Sync {
    async fn latest(&self) -> Option<PumpStatus>;
}

/// The pump radio and its command channel: a process-wide exclusive
/// resource per §5, dispatched only from the decision queue.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PumpDevice: Send + Sync {
    /// Whether a pump is currently connected over the radio.
    async fn is_connected(&self) -> bool;

    /// Whether the connected pump has a configured command channel (e.g. a
    /// paired session key). A connected pump can still lack this.
    async fn has_command_channel(&self) -> bool;

    /// Dispatches a temp basal. Returns what the device actually
    /// acknowledged, which may differ slightly from the request.
    async fn set_temp_basal(
        &self,
        rate_units_per_hour: f64,
        duration: chrono::Duration,
    ) -> Result<TempBasalAck, LoopError>;

    /// Dispatches a bolus.
    async fn set_normal_bolus(&self, units: f64) -> Result<(), LoopError>;

    /// When the radio was last retuned.
    async fn last_tuned(&self) -> Option<chrono::DateTime<chrono::Utc>>;

    /// Requests a radio retune.
    async fn tune(&self) -> Result<(), LoopError>;
}
