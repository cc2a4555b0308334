//! The shared context handed to every task of a dinner.

use crate::config::DinnerConfig;
use crate::error::DinnerError;
use crate::event_log::EventLog;
use crate::forks::ForkSet;
use crate::seat::Seat;
use crate::termination::{Termination, TerminationSignal};
use philo_env::{EventSink, PhilosopherId, TableContext};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Everything the philosophers and the watchdog share.
///
/// Built once by the orchestrator and passed to each task as an `Arc`.
pub struct Table<Ctx: TableContext> {
    pub config: DinnerConfig,
    pub ctx: Arc<Ctx>,
    pub forks: ForkSet,
    pub seats: Vec<Seat>,
    pub signal: Arc<TerminationSignal>,
    pub log: EventLog<Ctx>,
    finished: AtomicUsize,
}

impl<Ctx: TableContext> Table<Ctx> {
    /// Sets the table: forks, seats, signal and event log.
    pub fn new(
        config: DinnerConfig,
        ctx: Arc<Ctx>,
        sink: Box<dyn EventSink>,
    ) -> Result<Self, DinnerError> {
        let count = config.philosophers;
        let forks = ForkSet::new(count)?;
        let seats = (0..count).map(|i| Seat::new(i, count)).collect();
        let signal = Arc::new(TerminationSignal::new());
        let log = EventLog::new(Arc::clone(&ctx), Arc::clone(&signal), sink);

        Ok(Self {
            config,
            ctx,
            forks,
            seats,
            signal,
            log,
            finished: AtomicUsize::new(0),
        })
    }

    pub fn outcome(&self) -> Termination {
        self.signal.read()
    }

    pub fn is_running(&self) -> bool {
        self.signal.is_running()
    }

    /// Waits for `duration`, cut short if the dinner terminates.
    ///
    /// Returns true if the full duration elapsed while still running.
    pub async fn pause(&self, duration: Duration) -> bool {
        tokio::select! {
            _ = self.ctx.sleep(duration) => self.is_running(),
            _ = self.signal.wait() => false,
        }
    }

    /// Counts a philosopher that met the meal goal; the last one ends the dinner.
    pub fn philosopher_done(&self, id: PhilosopherId) {
        let done = self.finished.fetch_add(1, Ordering::AcqRel) + 1;
        debug!("Philosopher {} met the meal goal ({}/{})", id, done, self.seats.len());
        if done == self.seats.len() && self.log.report_goal() {
            debug!("Every philosopher met the meal goal");
        }
    }

    /// Number of philosophers that met the meal goal.
    pub fn finished_count(&self) -> usize {
        self.finished.load(Ordering::Acquire)
    }

    /// Meals eaten so far, by seat.
    pub fn meals(&self) -> Vec<u32> {
        self.seats.iter().map(Seat::meals_eaten).collect()
    }
}
