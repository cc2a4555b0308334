//! Dining Philosophers Verification Harness
//!
//! Runs named dinners against an in-memory sink and checks the captured
//! transcript for the guarantees the engine makes:
//! - **No deadlock**: meal counts keep rising on a comfortable table
//! - **Single death**: at most one `died` line, always the last one
//! - **Clean shutdown**: every fork is back on the table after the join
//!
//! # Usage
//!
//! ```ignore
//! use philo_sim::{ScenarioRunner, ScenarioId};
//!
//! let result = ScenarioRunner::new().run(ScenarioId::MealGoal).await;
//! assert!(result.passed);
//! ```

pub mod scenarios;
mod runner;
mod transcript;

pub use runner::{ScenarioResult, ScenarioRunner};
pub use scenarios::ScenarioId;
pub use transcript::{Action, Event, Transcript, TranscriptError};
