//! Orchestrator: seats the philosophers, starts the watchdog, waits for the
//! dinner to end and joins every task before returning.

use crate::config::DinnerConfig;
use crate::error::DinnerError;
use crate::philosopher::Philosopher;
use crate::table::Table;
use crate::termination::Termination;
use crate::watchdog::Watchdog;
use philo_env::{EventSink, TableContext};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Summary of a finished dinner.
#[derive(Debug, Clone, Serialize)]
pub struct DinnerReport {
    /// Why the dinner ended
    pub outcome: Termination,

    /// Meals eaten, indexed by seat
    pub meals: Vec<u32>,

    /// Milliseconds from start to the last task joining
    pub elapsed_ms: u64,

    /// Whether every fork was back on the table after the join
    pub forks_released: bool,
}

/// A dinner ready to run.
pub struct Dinner<Ctx: TableContext> {
    table: Arc<Table<Ctx>>,
}

impl<Ctx: TableContext> Dinner<Ctx> {
    /// Sets the table. Fails before any philosopher runs.
    pub fn new(
        config: DinnerConfig,
        ctx: Arc<Ctx>,
        sink: Box<dyn EventSink>,
    ) -> Result<Self, DinnerError> {
        let table = Table::new(config, ctx, sink)?;
        Ok(Self {
            table: Arc::new(table),
        })
    }

    /// Shared table, for observing a dinner while it runs.
    pub fn table(&self) -> &Arc<Table<Ctx>> {
        &self.table
    }

    /// Runs the dinner to completion.
    pub async fn run(self) -> DinnerReport {
        let table = self.table;
        let count = table.seats.len();
        info!(
            "Seating {} philosophers (die={}ms eat={}ms sleep={}ms goal={:?})",
            count,
            table.config.time_to_die_ms,
            table.config.time_to_eat_ms,
            table.config.time_to_sleep_ms,
            table.config.meal_goal,
        );

        let mut philosophers = JoinSet::new();
        for seat in 0..count {
            philosophers.spawn(Philosopher::new(Arc::clone(&table), seat).dine());
        }

        let mut watchdog = JoinSet::new();
        watchdog.spawn(Watchdog::new(Arc::clone(&table)).watch());

        let outcome = table.signal.wait().await;
        debug!("Dinner ended: {:?}, joining philosophers", outcome);

        while let Some(joined) = philosophers.join_next().await {
            if let Err(e) = joined {
                warn!("Philosopher task failed: {}", e);
            }
        }
        while let Some(joined) = watchdog.join_next().await {
            if let Err(e) = joined {
                warn!("Watchdog task failed: {}", e);
            }
        }

        let report = DinnerReport {
            outcome,
            meals: table.meals(),
            elapsed_ms: table.ctx.elapsed_ms(),
            forks_released: table.forks.all_free(),
        };
        info!(
            "Dinner over after {}ms: {:?}, {}/{} satisfied",
            report.elapsed_ms,
            report.outcome,
            table.finished_count(),
            count
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use philo_env::{MemorySink, PhilosopherId, TokioContext};
    use std::time::Duration;

    fn dinner(config: DinnerConfig) -> (Dinner<TokioContext>, MemorySink) {
        let sink = MemorySink::new();
        let dinner = Dinner::new(config, TokioContext::shared(), Box::new(sink.clone())).unwrap();
        (dinner, sink)
    }

    #[tokio::test(start_paused = true)]
    async fn test_lonely_dinner() {
        let (dinner, sink) = dinner(DinnerConfig::new(1, 200, 200, 200, None).unwrap());

        let report = dinner.run().await;

        assert_eq!(report.outcome, Termination::Died(PhilosopherId(1)));
        assert_eq!(report.meals, vec![0]);
        assert!(report.forks_released);
        assert_eq!(
            sink.lines(),
            vec![
                "0 1 is thinking".to_string(),
                "0 1 has taken a fork".to_string(),
                "200 1 died".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_meal_goal_dinner() {
        let (dinner, sink) = dinner(DinnerConfig::new(4, 410, 200, 200, Some(7)).unwrap());

        let report = dinner.run().await;

        assert_eq!(report.outcome, Termination::GoalReached);
        assert_eq!(report.meals, vec![7, 7, 7, 7]);
        assert!(report.forks_released);
        assert!(sink.lines().iter().all(|line| !line.ends_with(" died")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_starving_dinner_stops_everyone() {
        let (dinner, sink) = dinner(DinnerConfig::new(4, 310, 200, 100, None).unwrap());

        let report = dinner.run().await;

        assert!(matches!(report.outcome, Termination::Died(_)));
        assert!(report.forks_released);

        let lines = sink.lines();
        let deaths: Vec<_> = lines.iter().filter(|line| line.ends_with(" died")).collect();
        assert_eq!(deaths.len(), 1);
        assert!(lines.last().is_some_and(|line| line.ends_with(" died")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_odd_table_keeps_eating() {
        let (dinner, sink) = dinner(DinnerConfig::new(5, 800, 200, 200, None).unwrap());
        let table = Arc::clone(dinner.table());

        let run = tokio::time::timeout(Duration::from_millis(6000), dinner.run()).await;

        assert!(run.is_err(), "dinner ended: {:?}", table.outcome());
        assert!(sink.lines().iter().all(|line| !line.ends_with(" died")));
        assert!(table.meals().iter().all(|&meals| meals >= 9), "{:?}", table.meals());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_odd_table_survives_real_clock() {
        let (dinner, sink) = dinner(DinnerConfig::new(5, 800, 200, 200, None).unwrap());
        let table = Arc::clone(dinner.table());

        // More than three 600ms cycles per philosopher.
        let run = tokio::time::timeout(Duration::from_millis(2500), dinner.run()).await;

        assert!(run.is_err(), "dinner ended: {:?}", table.outcome());
        assert!(sink.lines().iter().all(|line| !line.ends_with(" died")));
        assert!(table.meals().iter().all(|&meals| meals >= 3), "{:?}", table.meals());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_meal_goal_real_clock() {
        let (dinner, sink) = dinner(DinnerConfig::new(4, 410, 200, 200, Some(7)).unwrap());

        let report = tokio::time::timeout(Duration::from_secs(10), dinner.run())
            .await
            .expect("dinner did not finish");

        assert_eq!(report.outcome, Termination::GoalReached);
        assert_eq!(report.meals, vec![7, 7, 7, 7]);
        assert!(report.forks_released);
        assert!(sink.lines().iter().all(|line| !line.ends_with(" died")));
    }

    #[test]
    fn test_empty_table_fails_before_running() {
        let config = DinnerConfig {
            philosophers: 0,
            ..DinnerConfig::new(1, 1, 1, 1, None).unwrap()
        };
        let result = Dinner::new(config, TokioContext::shared(), Box::new(MemorySink::new()));
        assert!(matches!(result, Err(DinnerError::ResourceInit(_))));
    }
}
