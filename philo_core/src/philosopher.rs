//! The philosopher loop: think, take forks, eat, put forks back, sleep.
//!
//! ```text
//!   ┌──────────┐   ┌─────────────┐   ┌────────┐   ┌─────────┐   ┌──────────┐
//!   │ Thinking │──►│ Taking forks│──►│ Eating │──►│ Release │──►│ Sleeping │──┐
//!   └──────────┘   └─────────────┘   └────────┘   └─────────┘   └──────────┘  │
//!        ▲                                                                     │
//!        └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every arrow checks the termination signal. Forks are RAII guards, so any
//! early return puts them back on the table.

use crate::event_log::Phase;
use crate::forks::HeldFork;
use crate::seat::Seat;
use crate::table::Table;
use philo_env::{PhilosopherId, TableContext};
use std::sync::Arc;
use tracing::trace;

/// Why a philosopher left the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// The dinner ended (someone died or the goal was reached)
    Stopped,

    /// This philosopher ate the configured number of meals
    Satisfied,

    /// This philosopher reported its own death (single-seat table)
    Starved,
}

/// One philosopher task.
pub struct Philosopher<Ctx: TableContext> {
    table: Arc<Table<Ctx>>,
    seat: usize,
    id: PhilosopherId,
}

impl<Ctx: TableContext> Philosopher<Ctx> {
    /// Seats a philosopher at `seat`, which must be below the table size.
    pub fn new(table: Arc<Table<Ctx>>, seat: usize) -> Self {
        debug_assert!(seat < table.seats.len());
        let id = PhilosopherId::from_seat(seat);
        Self { table, seat, id }
    }

    fn seat(&self) -> &Seat {
        &self.table.seats[self.seat]
    }

    /// Runs until this philosopher leaves the table.
    pub async fn dine(self) -> Departure {
        let departure = if self.table.seats.len() == 1 {
            self.dine_alone().await
        } else {
            self.dine_with_neighbours().await
        };
        trace!("Philosopher {} left the table: {:?}", self.id, departure);
        departure
    }

    /// A lone philosopher owns a single fork and can never eat.
    async fn dine_alone(&self) -> Departure {
        let table = &self.table;
        let seat = self.seat();

        if !table.log.emit(self.id, Phase::Thinking) {
            return Departure::Stopped;
        }
        let Some(fork) = self.take_fork(seat.left_fork).await else {
            return Departure::Stopped;
        };

        let starved = table.pause(table.config.time_to_die()).await
            && table.log.report_death(self.id);
        table.forks.release(fork);

        if starved {
            Departure::Starved
        } else {
            Departure::Stopped
        }
    }

    async fn dine_with_neighbours(&self) -> Departure {
        let table = &self.table;
        let seat = self.seat();
        let think = table.config.think_time();
        let mut first_cycle = true;

        loop {
            if !table.log.emit(self.id, Phase::Thinking) {
                return Departure::Stopped;
            }
            // With an odd table the neighbour that waited longest must get
            // the forks before this seat competes again.
            if !first_cycle && !think.is_zero() && !table.pause(think).await {
                return Departure::Stopped;
            }
            first_cycle = false;

            let Some((first, second)) = self.take_forks().await else {
                return Departure::Stopped;
            };

            seat.record_meal_start(table.ctx.now());
            if !table.log.emit(self.id, Phase::Eating) {
                return Departure::Stopped;
            }
            if !table.pause(table.config.time_to_eat()).await {
                return Departure::Stopped;
            }

            let meals = seat.finish_meal();
            if table.config.meal_goal == Some(meals) {
                seat.mark_finished();
                table.forks.release(first);
                table.forks.release(second);
                table.philosopher_done(self.id);
                return Departure::Satisfied;
            }

            table.forks.release(first);
            table.forks.release(second);

            if !table.log.emit(self.id, Phase::Sleeping) {
                return Departure::Stopped;
            }
            if !table.pause(table.config.time_to_sleep()).await {
                return Departure::Stopped;
            }
        }
    }

    /// Takes both forks in the parity order, announcing each one.
    async fn take_forks(&self) -> Option<(HeldFork, HeldFork)> {
        let (first, second) = self.seat().fork_order();
        let first = self.take_fork(first).await?;
        let second = self.take_fork(second).await?;
        Some((first, second))
    }

    /// Waits for a fork unless the dinner ends first.
    async fn take_fork(&self, index: usize) -> Option<HeldFork> {
        let table = &self.table;
        let fork = tokio::select! {
            fork = table.forks.acquire(index) => fork,
            _ = table.signal.wait() => return None,
        };
        if table.log.emit(self.id, Phase::TookFork) {
            Some(fork)
        } else {
            None
        }
    }
}
