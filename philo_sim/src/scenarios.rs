//! Named dinners used to verify the engine end to end.

use philo_core::{ConfigError, DinnerConfig};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// One philosopher, one fork: must starve at time_to_die
    Lonely,

    /// Five philosophers with comfortable timings: nobody starves
    Steady,

    /// Four philosophers with a meal goal: everyone eats exactly 7 times
    MealGoal,

    /// Four philosophers with a too-short deadline: exactly one death
    Starving,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Lonely,
            ScenarioId::Steady,
            ScenarioId::MealGoal,
            ScenarioId::Starving,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Lonely => "lonely",
            ScenarioId::Steady => "steady",
            ScenarioId::MealGoal => "meal_goal",
            ScenarioId::Starving => "starving",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Lonely => "1 200 200 200: thinks, takes its only fork, dies at 200ms",
            ScenarioId::Steady => "5 800 200 200: no death during the window, meals keep rising",
            ScenarioId::MealGoal => "4 410 200 200 7: ends without a death, 7 meals each",
            ScenarioId::Starving => "4 310 200 100: exactly one death, nothing printed after it",
        }
    }

    /// Positional arguments of the scenario, as typed on the command line.
    pub fn args(&self) -> &'static [&'static str] {
        match self {
            ScenarioId::Lonely => &["1", "200", "200", "200"],
            ScenarioId::Steady => &["5", "800", "200", "200"],
            ScenarioId::MealGoal => &["4", "410", "200", "200", "7"],
            ScenarioId::Starving => &["4", "310", "200", "100"],
        }
    }

    pub fn config(&self) -> Result<DinnerConfig, ConfigError> {
        DinnerConfig::from_args(self.args())
    }

    /// True if the dinner is expected to run until stopped from outside.
    pub fn is_open_ended(&self) -> bool {
        matches!(self, ScenarioId::Steady)
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lonely" | "single" => Ok(ScenarioId::Lonely),
            "steady" => Ok(ScenarioId::Steady),
            "meal_goal" | "mealgoal" | "goal" => Ok(ScenarioId::MealGoal),
            "starving" | "death" => Ok(ScenarioId::Starving),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
