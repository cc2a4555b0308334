//! Parsing and checking captured event lines.

use philo_core::{Phase, DIED_LABEL};
use philo_env::PhilosopherId;
use thiserror::Error;

/// A line that does not follow `<ms> <id> <action>`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("Malformed line {index}: {line:?}")]
    Malformed { index: usize, line: String },

    #[error("Unknown action on line {index}: {action:?}")]
    UnknownAction { index: usize, action: String },
}

/// What a line announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Phase(Phase),
    Died,
}

impl Action {
    fn parse(text: &str) -> Option<Self> {
        if text == DIED_LABEL {
            return Some(Action::Died);
        }
        [Phase::Thinking, Phase::TookFork, Phase::Eating, Phase::Sleeping]
            .into_iter()
            .find(|phase| phase.label() == text)
            .map(Action::Phase)
    }
}

/// One parsed event line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub at_ms: u64,
    pub id: PhilosopherId,
    pub action: Action,
}

/// The ordered event lines of one dinner.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub events: Vec<Event>,
}

impl Transcript {
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self, TranscriptError> {
        let mut events = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let malformed = || TranscriptError::Malformed {
                index,
                line: line.to_string(),
            };

            let mut parts = line.splitn(3, ' ');
            let at_ms = parts.next().and_then(|s| s.parse().ok()).ok_or_else(malformed)?;
            let id = parts
                .next()
                .and_then(|s| s.parse::<u32>().ok())
                .filter(|id| *id > 0)
                .ok_or_else(malformed)?;
            let text = parts.next().ok_or_else(malformed)?;
            let action = Action::parse(text).ok_or_else(|| TranscriptError::UnknownAction {
                index,
                action: text.to_string(),
            })?;

            events.push(Event {
                at_ms,
                id: PhilosopherId(id),
                action,
            });
        }
        Ok(Self { events })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn deaths(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| event.action == Action::Died)
            .collect()
    }

    /// Number of `is eating` lines per philosopher, indexed by seat.
    pub fn meals_started(&self, philosophers: usize) -> Vec<u32> {
        let mut meals = vec![0; philosophers];
        for event in &self.events {
            if event.action == Action::Phase(Phase::Eating) {
                if let Some(count) = event.id.seat().and_then(|seat| meals.get_mut(seat)) {
                    *count += 1;
                }
            }
        }
        meals
    }

    /// Checks the ordering guarantees every dinner must uphold.
    ///
    /// - timestamps never go backwards
    /// - at most one `died` line, and it is the last line
    /// - a philosopher holds at most two forks and eats only with two
    pub fn check(&self, philosophers: usize) -> Result<(), String> {
        let deaths = self.deaths();
        if deaths.len() > 1 {
            return Err(format!("{} death lines", deaths.len()));
        }
        if let Some(death) = deaths.first() {
            if self.events.last() != Some(*death) {
                return Err(format!("lines printed after philosopher {} died", death.id));
            }
        }

        let mut last_ms = 0;
        let mut forks = vec![0u8; philosophers];
        for (index, event) in self.events.iter().enumerate() {
            if event.at_ms < last_ms {
                return Err(format!("line {} goes back in time ({} < {})", index, event.at_ms, last_ms));
            }
            last_ms = event.at_ms;

            let Some(held) = event.id.seat().and_then(|seat| forks.get_mut(seat)) else {
                return Err(format!("line {} names unknown philosopher {}", index, event.id));
            };
            match event.action {
                Action::Phase(Phase::Thinking) => *held = 0,
                Action::Phase(Phase::TookFork) => {
                    *held += 1;
                    if *held > 2 {
                        return Err(format!("philosopher {} took a third fork", event.id));
                    }
                }
                Action::Phase(Phase::Eating) => {
                    if *held != 2 {
                        return Err(format!("philosopher {} ate with {} fork(s)", event.id, held));
                    }
                }
                Action::Phase(Phase::Sleeping) | Action::Died => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        let transcript =
            Transcript::parse(&["0 1 is thinking", "0 1 has taken a fork", "200 1 died"]).unwrap();

        assert_eq!(transcript.len(), 3);
        assert_eq!(
            transcript.events[2],
            Event {
                at_ms: 200,
                id: PhilosopherId(1),
                action: Action::Died,
            }
        );
        assert!(transcript.check(1).is_ok());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Transcript::parse(&["zero 1 is thinking"]),
            Err(TranscriptError::Malformed { index: 0, .. })
        ));
        assert!(matches!(
            Transcript::parse(&["0 1 is thinking", "5 1 is dancing"]),
            Err(TranscriptError::UnknownAction { index: 1, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_seat_zero() {
        assert!(Transcript::parse(&["0 0 is thinking"]).is_err());
    }

    #[test]
    fn test_check_rejects_lines_after_death() {
        let transcript = Transcript::parse(&["0 1 is thinking", "300 2 died", "301 1 is eating"]).unwrap();
        assert!(transcript.check(2).is_err());
    }

    #[test]
    fn test_check_rejects_two_deaths() {
        let transcript = Transcript::parse(&["300 2 died", "300 1 died"]).unwrap();
        assert_eq!(transcript.check(2), Err("2 death lines".to_string()));
    }

    #[test]
    fn test_check_rejects_eating_with_one_fork() {
        let transcript =
            Transcript::parse(&["0 1 is thinking", "0 1 has taken a fork", "0 1 is eating"]).unwrap();
        assert!(transcript.check(2).is_err());
    }

    #[test]
    fn test_meals_started() {
        let transcript = Transcript::parse(&[
            "0 1 has taken a fork",
            "0 1 has taken a fork",
            "0 1 is eating",
            "0 3 has taken a fork",
            "0 3 has taken a fork",
            "0 3 is eating",
            "200 1 is sleeping",
        ])
        .unwrap();
        assert_eq!(transcript.meals_started(3), vec![1, 0, 1]);
    }
}
