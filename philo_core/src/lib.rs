//! Dining Philosophers Engine
//!
//! N philosophers sit around a table with one fork between each pair of
//! neighbours. Each one thinks, takes two forks, eats, puts them back and
//! sleeps, forever, unless it goes longer than `time_to_die` without
//! starting a meal. The engine solves three problems:
//! 1. **Deadlock**: forks are taken in a parity order (even ids right first)
//! 2. **Stale output**: status lines are serialized and suppressed after termination
//! 3. **Prompt shutdown**: every wait races a write-once termination signal
//!
//! # Usage
//!
//! ```ignore
//! use philo_core::{Dinner, DinnerConfig};
//! use philo_env::{StdoutSink, TokioContext};
//!
//! let config = DinnerConfig::from_args(&["5", "800", "200", "200"])?;
//! let dinner = Dinner::new(config, TokioContext::shared(), Box::new(StdoutSink::new()))?;
//! let report = dinner.run().await;
//! ```

pub mod config;
pub mod error;
pub mod termination;
pub mod event_log;
pub mod forks;
pub mod seat;
pub mod table;
pub mod philosopher;
pub mod watchdog;
pub mod dinner;

// Re-export key types for convenience
pub use config::{parse_lenient, DinnerConfig, DEFAULT_WATCHDOG_POLL};
pub use error::{ConfigError, DinnerError};
pub use termination::{Termination, TerminationSignal};
pub use event_log::{EventLog, Phase, DIED_LABEL};
pub use forks::{ForkSet, HeldFork};
pub use seat::Seat;
pub use table::Table;
pub use philosopher::{Departure, Philosopher};
pub use watchdog::Watchdog;
pub use dinner::{Dinner, DinnerReport};
