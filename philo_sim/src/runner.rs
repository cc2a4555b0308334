//! Scenario runner - executes a named dinner against an in-memory sink and
//! checks the transcript.

use crate::scenarios::ScenarioId;
use crate::transcript::Transcript;

use philo_core::{Dinner, DinnerConfig, DinnerReport, Termination, DEFAULT_WATCHDOG_POLL};
use philo_env::{MemorySink, TableContext, TokioContext};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Allowed lateness of the lonely philosopher's death line.
const DEATH_TOLERANCE_MS: u64 = 10;

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario that was run
    #[serde(serialize_with = "serialize_scenario")]
    pub scenario: ScenarioId,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// State of the termination signal when the scenario ended
    pub outcome: Termination,

    /// Completed meals per seat
    pub meals: Vec<u32>,

    /// Simulation time when the scenario ended
    pub elapsed_ms: u64,

    /// Number of event lines printed
    pub lines: usize,

    /// Failure message if any
    pub failure_reason: Option<String>,
}

fn serialize_scenario<S: serde::Serializer>(id: &ScenarioId, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(id.name())
}

/// What a run produced, before the scenario-specific checks.
struct Observation {
    outcome: Termination,
    meals: Vec<u32>,
    elapsed_ms: u64,
    forks_released: bool,
    lines: Vec<String>,
    /// Meals at the half-way point of an open-ended run
    halfway_meals: Option<Vec<u32>>,
}

/// Runs scenarios.
pub struct ScenarioRunner {
    /// How long open-ended scenarios run
    window: Duration,

    /// Watchdog polling interval
    watchdog_poll: Duration,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new() -> Self {
        Self {
            window: Duration::from_secs(5),
            watchdog_poll: DEFAULT_WATCHDOG_POLL,
        }
    }

    /// Sets how long open-ended scenarios run.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Sets the watchdog polling interval.
    pub fn with_watchdog_poll(mut self, poll: Duration) -> Self {
        self.watchdog_poll = poll;
        self
    }

    /// Runs a scenario and returns the result.
    pub async fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} ({})", scenario.name(), scenario.description());

        let config = match scenario.config() {
            Ok(config) => config.with_watchdog_poll(self.watchdog_poll),
            Err(e) => return Self::broken(scenario, e.to_string()),
        };

        let observation = match self.observe(scenario, config.clone()).await {
            Ok(observation) => observation,
            Err(reason) => return Self::broken(scenario, reason),
        };

        let failure_reason = Self::verify(scenario, &config, &observation).err();
        debug!(
            "Scenario {} ended at {}ms with {:?}, meals {:?}",
            scenario, observation.elapsed_ms, observation.outcome, observation.meals
        );

        ScenarioResult {
            scenario,
            passed: failure_reason.is_none(),
            outcome: observation.outcome,
            meals: observation.meals,
            elapsed_ms: observation.elapsed_ms,
            lines: observation.lines.len(),
            failure_reason,
        }
    }

    async fn observe(&self, scenario: ScenarioId, config: DinnerConfig) -> Result<Observation, String> {
        let sink = MemorySink::new();
        let ctx = TokioContext::shared();
        let dinner = Dinner::new(config, Arc::clone(&ctx), Box::new(sink.clone()))
            .map_err(|e| e.to_string())?;

        if !scenario.is_open_ended() {
            let report = dinner.run().await;
            return Ok(Self::from_report(report, sink.lines(), None));
        }

        // Open-ended dinners are sampled half-way and stopped at the end of
        // the window by dropping the run, which aborts every task.
        let table = Arc::clone(dinner.table());
        let halfway = self.window / 2;
        let run = dinner.run();
        tokio::pin!(run);

        let halfway_meals = tokio::select! {
            report = &mut run => return Ok(Self::from_report(report, sink.lines(), None)),
            _ = ctx.sleep(halfway) => table.meals(),
        };
        tokio::select! {
            report = &mut run => return Ok(Self::from_report(report, sink.lines(), Some(halfway_meals))),
            _ = ctx.sleep(self.window - halfway) => {}
        };

        Ok(Observation {
            outcome: table.outcome(),
            meals: table.meals(),
            elapsed_ms: ctx.elapsed_ms(),
            forks_released: false,
            lines: sink.lines(),
            halfway_meals: Some(halfway_meals),
        })
    }

    fn from_report(report: DinnerReport, lines: Vec<String>, halfway_meals: Option<Vec<u32>>) -> Observation {
        Observation {
            outcome: report.outcome,
            meals: report.meals,
            elapsed_ms: report.elapsed_ms,
            forks_released: report.forks_released,
            lines,
            halfway_meals,
        }
    }

    fn verify(scenario: ScenarioId, config: &DinnerConfig, seen: &Observation) -> Result<(), String> {
        let transcript = Transcript::parse(seen.lines.as_slice()).map_err(|e| e.to_string())?;
        transcript.check(config.philosophers)?;
        Self::check_meal_lines(&transcript, config, seen)?;

        let deaths = transcript.deaths();
        match scenario {
            ScenarioId::Lonely => {
                let expected = ["1 is thinking", "1 has taken a fork", "1 died"];
                let actual: Vec<&str> = seen
                    .lines
                    .iter()
                    .map(|line| line.split_once(' ').map_or(line.as_str(), |(_, rest)| rest))
                    .collect();
                if actual != expected {
                    return Err(format!("unexpected lines {:?}", seen.lines));
                }
                let died_at = deaths.first().map_or(0, |event| event.at_ms);
                let deadline = config.time_to_die_ms;
                if died_at < deadline || died_at > deadline + DEATH_TOLERANCE_MS {
                    return Err(format!("died at {}ms, expected ~{}ms", died_at, deadline));
                }
                Self::require_forks_released(seen)
            }
            ScenarioId::Steady => {
                if !deaths.is_empty() || !seen.outcome.is_running() {
                    return Err(format!("dinner ended early: {:?}", seen.outcome));
                }
                let halfway = seen.halfway_meals.as_deref().unwrap_or_default();
                if halfway.iter().any(|meals| *meals == 0) {
                    return Err(format!("someone never ate in the first half: {:?}", halfway));
                }
                let stalled: Vec<usize> = halfway
                    .iter()
                    .zip(&seen.meals)
                    .enumerate()
                    .filter(|(_, (before, after))| after <= before)
                    .map(|(seat, _)| seat + 1)
                    .collect();
                if !stalled.is_empty() {
                    return Err(format!("philosophers {:?} stopped eating", stalled));
                }
                Ok(())
            }
            ScenarioId::MealGoal => {
                if seen.outcome != Termination::GoalReached {
                    return Err(format!("expected the goal to be reached, got {:?}", seen.outcome));
                }
                let goal = config.meal_goal.unwrap_or_default();
                if seen.meals.iter().any(|meals| *meals != goal) {
                    return Err(format!("expected {} meals each, got {:?}", goal, seen.meals));
                }
                Self::require_forks_released(seen)
            }
            ScenarioId::Starving => {
                if deaths.len() != 1 || !matches!(seen.outcome, Termination::Died(_)) {
                    return Err(format!(
                        "expected exactly one death, got {} ({:?})",
                        deaths.len(),
                        seen.outcome
                    ));
                }
                Self::require_forks_released(seen)
            }
        }
    }

    /// Every completed meal was announced, and at most one per seat was cut short.
    fn check_meal_lines(transcript: &Transcript, config: &DinnerConfig, seen: &Observation) -> Result<(), String> {
        let started = transcript.meals_started(config.philosophers);
        for (seat, (&started, &completed)) in started.iter().zip(&seen.meals).enumerate() {
            if started < completed || started > completed + 1 {
                return Err(format!(
                    "philosopher {} announced {} meals but completed {}",
                    seat + 1,
                    started,
                    completed
                ));
            }
        }
        Ok(())
    }

    fn require_forks_released(seen: &Observation) -> Result<(), String> {
        if seen.forks_released {
            Ok(())
        } else {
            Err("forks still held after the dinner".to_string())
        }
    }

    fn broken(scenario: ScenarioId, reason: String) -> ScenarioResult {
        ScenarioResult {
            scenario,
            passed: false,
            outcome: Termination::Running,
            meals: Vec::new(),
            elapsed_ms: 0,
            lines: 0,
            failure_reason: Some(reason),
        }
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
