//! The shared, write-once termination signal.

use philo_env::PhilosopherId;
use serde::Serialize;
use tokio::sync::watch;

/// State of the dinner as seen by every task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// Nobody has starved and the meal goal is not yet met
    Running,

    /// The given philosopher exceeded `time_to_die`
    Died(PhilosopherId),

    /// Every philosopher ate the configured number of meals
    GoalReached,
}

impl Termination {
    pub fn is_running(&self) -> bool {
        matches!(self, Termination::Running)
    }
}

/// Tri-state flag with first-writer-wins semantics.
///
/// Transitions out of [`Termination::Running`] happen at most once; every
/// later write is a no-op. Waiters are woken through a `watch` channel
/// instead of polling.
#[derive(Debug)]
pub struct TerminationSignal {
    tx: watch::Sender<Termination>,
}

impl TerminationSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Termination::Running);
        Self { tx }
    }

    /// Non-blocking snapshot of the current state.
    pub fn read(&self) -> Termination {
        *self.tx.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.read().is_running()
    }

    /// Records the death of `id` if the dinner is still running.
    ///
    /// Returns true only for the single call that performs the transition.
    /// The caller must print the death line under the event log lock; see
    /// [`crate::EventLog::report_death`].
    pub fn try_report_death(&self, id: PhilosopherId) -> bool {
        self.transition(Termination::Died(id))
    }

    /// Records that the meal goal was reached if the dinner is still running.
    pub fn try_report_goal(&self) -> bool {
        self.transition(Termination::GoalReached)
    }

    fn transition(&self, next: Termination) -> bool {
        self.tx.send_if_modified(|state| {
            if state.is_running() {
                *state = next;
                true
            } else {
                false
            }
        })
    }

    /// Waits until the dinner is no longer running and returns the final state.
    pub async fn wait(&self) -> Termination {
        let mut rx = self.tx.subscribe();
        // Bound to a local so the `watch::Ref` is released before `rx` drops.
        let outcome = match rx.wait_for(|state| !state.is_running()).await {
            Ok(state) => *state,
            Err(_) => self.read(),
        };
        outcome
    }
}

impl Default for TerminationSignal {
    fn default() -> Self {
        Self::new()
    }
}
