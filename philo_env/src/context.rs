//! Core environment context trait for the dining table.

use async_trait::async_trait;
use std::time::Duration;

/// The clock every philosopher, the watchdog and the event log share.
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `tokio::time`
///
/// Because `TokioContext` reads `tokio::time::Instant`, running under a
/// paused tokio runtime turns it into a deterministic virtual clock.
#[async_trait]
pub trait TableContext: Send + Sync + 'static {
    /// Returns the monotonic time since the context was created.
    ///
    /// The baseline is fixed once, at simulation start.
    fn now(&self) -> Duration;

    /// Whole milliseconds since simulation start, as printed in event lines.
    fn elapsed_ms(&self) -> u64 {
        self.now().as_millis() as u64
    }

    /// Suspends the calling task for the given duration.
    async fn sleep(&self, duration: Duration);
}
