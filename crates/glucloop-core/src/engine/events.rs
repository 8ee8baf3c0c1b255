use crate::domain::LoopError;

/// Outbound signals (§6) plus the two analytics events named in §7's
/// propagation policy, folded into the same channel so a caller can wire
/// up a real analytics sink without the engine depending on one.
#[derive(Debug, Clone)]
pub enum LoopEvent {
    /// Fires on every settled tick; suppressed while `waitingForSentry`.
    LoopDataUpdated,
    /// Fires immediately on `PumpStatusUpdated`, before the sentry delay.
    LoopRunning,
    /// A tick transitioned `last_loop_error` from `None` to `Some`.
    AnalyticsError(LoopError),
    /// A tick transitioned `last_loop_completed` to a new timestamp.
    AnalyticsLoopCompleted,
}

/// Capacity for the outbound broadcast channel. Generous enough that a
/// slow observer doesn't cause `send` to fail under normal tick cadence.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
