//! Starvation watchdog.
//!
//! Scans every seat at a fixed interval and reports the first philosopher
//! whose last meal started more than `time_to_die` ago. Philosophers that
//! already met the meal goal are no longer supervised.

use crate::table::Table;
use philo_env::{PhilosopherId, TableContext};
use std::sync::Arc;
use tracing::debug;

pub struct Watchdog<Ctx: TableContext> {
    table: Arc<Table<Ctx>>,
}

impl<Ctx: TableContext> Watchdog<Ctx> {
    pub fn new(table: Arc<Table<Ctx>>) -> Self {
        Self { table }
    }

    /// Runs until the dinner terminates.
    ///
    /// Returns the philosopher this watchdog declared dead, if any.
    pub async fn watch(self) -> Option<PhilosopherId> {
        let poll = self.table.config.watchdog_poll;
        loop {
            if !self.table.is_running() {
                return None;
            }
            if let Some(id) = self.scan() {
                if self.table.log.report_death(id) {
                    debug!("Watchdog: philosopher {} starved", id);
                    return Some(id);
                }
                return None;
            }
            if !self.table.pause(poll).await {
                return None;
            }
        }
    }

    /// Returns the first starving philosopher, if any.
    pub fn scan(&self) -> Option<PhilosopherId> {
        let now = self.table.ctx.now();
        let deadline = self.table.config.time_to_die();
        self.table
            .seats
            .iter()
            .filter(|seat| !seat.is_finished())
            .find(|seat| seat.hungry_for(now) > deadline)
            .map(|seat| seat.id)
    }
}
