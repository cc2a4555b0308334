//! Dinner configuration and the lenient integer parser used for arguments.

use crate::error::ConfigError;
use serde::Serialize;
use std::time::Duration;

/// Default watchdog polling interval.
pub const DEFAULT_WATCHDOG_POLL: Duration = Duration::from_millis(1);

/// Immutable configuration of one dinner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DinnerConfig {
    /// Number of philosophers (and forks)
    pub philosophers: usize,

    /// Maximum time between the start of two meals (ms)
    pub time_to_die_ms: u64,

    /// Time spent eating (ms)
    pub time_to_eat_ms: u64,

    /// Time spent sleeping (ms)
    pub time_to_sleep_ms: u64,

    /// Meals every philosopher must eat before the dinner ends
    pub meal_goal: Option<u32>,

    /// Interval between two watchdog scans
    #[serde(skip)]
    pub watchdog_poll: Duration,
}

impl DinnerConfig {
    /// Builds a validated configuration.
    pub fn new(
        philosophers: usize,
        time_to_die_ms: u64,
        time_to_eat_ms: u64,
        time_to_sleep_ms: u64,
        meal_goal: Option<u32>,
    ) -> Result<Self, ConfigError> {
        let mandatory = [
            ("number_of_philosophers", philosophers as i64),
            ("time_to_die", time_to_die_ms as i64),
            ("time_to_eat", time_to_eat_ms as i64),
            ("time_to_sleep", time_to_sleep_ms as i64),
        ];
        for (name, value) in mandatory {
            if value <= 0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        if meal_goal == Some(0) {
            return Err(ConfigError::GoalNotPositive(0));
        }

        Ok(Self {
            philosophers,
            time_to_die_ms,
            time_to_eat_ms,
            time_to_sleep_ms,
            meal_goal,
            watchdog_poll: DEFAULT_WATCHDOG_POLL,
        })
    }

    /// Parses the positional values
    /// `number_of_philosophers time_to_die time_to_eat time_to_sleep [meal_goal]`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ConfigError> {
        if !(4..=5).contains(&args.len()) {
            return Err(ConfigError::ArgumentCount(args.len()));
        }

        let names = [
            "number_of_philosophers",
            "time_to_die",
            "time_to_eat",
            "time_to_sleep",
        ];
        let mut values = [0u32; 4];
        for (slot, (name, raw)) in values.iter_mut().zip(names.into_iter().zip(args)) {
            let value = parse_lenient(raw.as_ref());
            if value <= 0 {
                return Err(ConfigError::NotPositive { name, value });
            }
            *slot = u32::try_from(value).map_err(|_| ConfigError::OutOfRange { name, value })?;
        }

        let meal_goal = match args.get(4) {
            Some(raw) => {
                let value = parse_lenient(raw.as_ref());
                if value <= 0 {
                    return Err(ConfigError::GoalNotPositive(value));
                }
                let goal = u32::try_from(value).map_err(|_| ConfigError::OutOfRange {
                    name: "number_of_times_each_philosopher_must_eat",
                    value,
                })?;
                Some(goal)
            }
            None => None,
        };

        let [philosophers, die, eat, sleep] = values;
        Self::new(
            philosophers as usize,
            u64::from(die),
            u64::from(eat),
            u64::from(sleep),
            meal_goal,
        )
    }

    /// Sets the watchdog polling interval.
    pub fn with_watchdog_poll(mut self, poll: Duration) -> Self {
        self.watchdog_poll = poll;
        self
    }

    pub fn time_to_die(&self) -> Duration {
        Duration::from_millis(self.time_to_die_ms)
    }

    pub fn time_to_eat(&self) -> Duration {
        Duration::from_millis(self.time_to_eat_ms)
    }

    pub fn time_to_sleep(&self) -> Duration {
        Duration::from_millis(self.time_to_sleep_ms)
    }

    /// Extra thinking between meals, non-zero only for odd tables.
    ///
    /// With an odd seat count one neighbour is always a full eating period
    /// behind, so a philosopher waits until `2 * eat` has passed since it
    /// put its forks down.
    pub fn think_time(&self) -> Duration {
        if self.philosophers % 2 == 0 || self.philosophers == 1 {
            return Duration::ZERO;
        }
        Duration::from_millis((2 * self.time_to_eat_ms).saturating_sub(self.time_to_sleep_ms))
    }
}

/// Reads an integer the way C `atoi` does.
///
/// Skips leading ASCII whitespace, accepts one optional sign, then consumes
/// the longest run of decimal digits. Anything after the digits is ignored
/// and an empty digit run yields 0. Saturates instead of overflowing.
pub fn parse_lenient(input: &str) -> i64 {
    let trimmed = input.trim_start_matches(|c: char| c == ' ' || ('\t'..='\r').contains(&c));

    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_lenient_tolerates_whitespace_and_sign() {
        assert_eq!(parse_lenient("42"), 42);
        assert_eq!(parse_lenient("  \t+42"), 42);
        assert_eq!(parse_lenient("-7"), -7);
        assert_eq!(parse_lenient("200ms"), 200);
        assert_eq!(parse_lenient("abc"), 0);
        assert_eq!(parse_lenient(""), 0);
        assert_eq!(parse_lenient("+-3"), 0);
    }

    #[test]
    fn test_from_args_without_goal() {
        let config = DinnerConfig::from_args(&["5", "800", "200", "200"]).unwrap();
        assert_eq!(config.philosophers, 5);
        assert_eq!(config.time_to_die(), Duration::from_millis(800));
        assert_eq!(config.meal_goal, None);
        assert_eq!(config.watchdog_poll, DEFAULT_WATCHDOG_POLL);
    }

    #[test]
    fn test_think_time_only_on_odd_tables() {
        let odd = DinnerConfig::new(5, 800, 200, 200, None).unwrap();
        assert_eq!(odd.think_time(), Duration::from_millis(200));

        let even = DinnerConfig::new(4, 410, 200, 200, None).unwrap();
        assert_eq!(even.think_time(), Duration::ZERO);

        let lonely = DinnerConfig::new(1, 800, 200, 200, None).unwrap();
        assert_eq!(lonely.think_time(), Duration::ZERO);

        // Long sleeps already give the neighbours time to eat.
        let sleepy = DinnerConfig::new(3, 800, 100, 300, None).unwrap();
        assert_eq!(sleepy.think_time(), Duration::ZERO);
    }

    #[test]
    fn test_from_args_with_goal() {
        let config = DinnerConfig::from_args(&["4", "410", "200", "200", " 7"]).unwrap();
        assert_eq!(config.meal_goal, Some(7));
    }

    #[test]
    fn test_from_args_rejects_wrong_count() {
        assert_eq!(
            DinnerConfig::from_args(&["4", "410", "200"]),
            Err(ConfigError::ArgumentCount(3))
        );
        assert_eq!(
            DinnerConfig::from_args(&["1", "2", "3", "4", "5", "6"]),
            Err(ConfigError::ArgumentCount(6))
        );
    }

    #[test]
    fn test_from_args_rejects_non_positive() {
        assert_eq!(
            DinnerConfig::from_args(&["0", "410", "200", "200"]),
            Err(ConfigError::NotPositive { name: "number_of_philosophers", value: 0 })
        );
        assert_eq!(
            DinnerConfig::from_args(&["4", "-410", "200", "200"]),
            Err(ConfigError::NotPositive { name: "time_to_die", value: -410 })
        );
        assert_eq!(
            DinnerConfig::from_args(&["4", "410", "200", "200", "0"]),
            Err(ConfigError::GoalNotPositive(0))
        );
    }

    #[test]
    fn test_from_args_rejects_out_of_range() {
        let err = DinnerConfig::from_args(&["4", "99999999999", "200", "200"]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::OutOfRange { name: "time_to_die", value: 99_999_999_999 }
        );
    }

    proptest! {
        #[test]
        fn prop_parse_lenient_matches_display(n in any::<i32>(), pad in "[ \t]{0,3}", tail in "[a-z]{0,3}") {
            let input = format!("{}{}{}", pad, n, tail);
            prop_assert_eq!(parse_lenient(&input), i64::from(n));
        }

        #[test]
        fn prop_positive_values_always_accepted(
            n in 1u32..500,
            die in 1u32..100_000,
            eat in 1u32..100_000,
            sleep in 1u32..100_000,
            goal in proptest::option::of(1u32..1000),
        ) {
            let mut args = vec![n.to_string(), die.to_string(), eat.to_string(), sleep.to_string()];
            if let Some(goal) = goal {
                args.push(goal.to_string());
            }
            let config = DinnerConfig::from_args(args.as_slice()).unwrap();
            prop_assert_eq!(config.philosophers, n as usize);
            prop_assert_eq!(config.time_to_die_ms, u64::from(die));
            prop_assert_eq!(config.meal_goal, goal);
        }
    }
}
