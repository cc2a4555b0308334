//! Serialized status output.
//!
//! Every line is written while holding one lock, and the termination signal
//! is re-checked under that lock. The death transition also happens under
//! it, which gives two guarantees:
//!
//! - at most one `died` line is ever printed
//! - no status line is printed after the `died` line
//!
//! Lock order is always log lock → termination signal.

use crate::termination::TerminationSignal;
use philo_env::{EventSink, PhilosopherId, TableContext};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Label of the line printed when a philosopher starves.
pub const DIED_LABEL: &str = "died";

/// Routine phases a philosopher announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Thinking,
    TookFork,
    Eating,
    Sleeping,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Thinking => "is thinking",
            Phase::TookFork => "has taken a fork",
            Phase::Eating => "is eating",
            Phase::Sleeping => "is sleeping",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Process-wide event log bound to a clock and a termination signal.
pub struct EventLog<Ctx: TableContext> {
    ctx: Arc<Ctx>,
    signal: Arc<TerminationSignal>,
    sink: Mutex<Box<dyn EventSink>>,
}

impl<Ctx: TableContext> EventLog<Ctx> {
    pub fn new(ctx: Arc<Ctx>, signal: Arc<TerminationSignal>, sink: Box<dyn EventSink>) -> Self {
        Self {
            ctx,
            signal,
            sink: Mutex::new(sink),
        }
    }

    /// Prints `<elapsed_ms> <id> <phase>` if the dinner is still running.
    ///
    /// Returns false, without printing, once the dinner has terminated.
    pub fn emit(&self, id: PhilosopherId, phase: Phase) -> bool {
        let mut sink = self.lock();
        if !self.signal.is_running() {
            return false;
        }
        self.write(&mut **sink, id, phase.label());
        true
    }

    /// Records the death of `id` and prints its `died` line, atomically.
    ///
    /// Returns true if this call won the termination race.
    pub fn report_death(&self, id: PhilosopherId) -> bool {
        let mut sink = self.lock();
        if !self.signal.try_report_death(id) {
            return false;
        }
        self.write(&mut **sink, id, DIED_LABEL);
        true
    }

    /// Records that every philosopher met the meal goal. Prints nothing.
    pub fn report_goal(&self) -> bool {
        let _sink = self.lock();
        self.signal.try_report_goal()
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn EventSink>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, sink: &mut dyn EventSink, id: PhilosopherId, label: &str) {
        let line = format!("{} {} {}", self.ctx.elapsed_ms(), id, label);
        if let Err(e) = sink.write_line(&line) {
            warn!("Failed to write status line {:?}: {}", line, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::termination::Termination;
    use philo_env::{MemorySink, TokioContext};
    use std::time::Duration;

    fn log_with_sink() -> (EventLog<TokioContext>, Arc<TerminationSignal>, MemorySink) {
        let signal = Arc::new(TerminationSignal::new());
        let sink = MemorySink::new();
        let log = EventLog::new(
            TokioContext::shared(),
            Arc::clone(&signal),
            Box::new(sink.clone()),
        );
        (log, signal, sink)
    }

    #[tokio::test(start_paused = true)]
    async fn test_emit_formats_line() {
        let (log, _signal, sink) = log_with_sink();

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(log.emit(PhilosopherId(2), Phase::TookFork));

        assert_eq!(sink.lines(), vec!["120 2 has taken a fork".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_death_line() {
        let (log, signal, sink) = log_with_sink();

        log.emit(PhilosopherId(1), Phase::Thinking);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(log.report_death(PhilosopherId(1)));
        assert!(!log.report_death(PhilosopherId(2)));

        assert_eq!(signal.read(), Termination::Died(PhilosopherId(1)));
        assert_eq!(
            sink.lines(),
            vec!["0 1 is thinking".to_string(), "200 1 died".to_string()]
        );
    }

    #[tokio::test]
    async fn test_emit_is_noop_after_termination() {
        let (log, signal, sink) = log_with_sink();

        assert!(log.report_death(PhilosopherId(3)));
        let before = sink.len();

        for phase in [Phase::Thinking, Phase::TookFork, Phase::Eating, Phase::Sleeping] {
            for id in 1..=4 {
                assert!(!log.emit(PhilosopherId(id), phase));
            }
        }

        assert_eq!(sink.len(), before);
        assert!(!signal.is_running());
    }

    #[tokio::test]
    async fn test_goal_report_prints_nothing() {
        let (log, signal, sink) = log_with_sink();

        assert!(log.report_goal());
        assert!(!log.report_death(PhilosopherId(1)));
        assert!(!log.emit(PhilosopherId(1), Phase::Eating));

        assert!(sink.is_empty());
        assert_eq!(signal.read(), Termination::GoalReached);
    }
}
