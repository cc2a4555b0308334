//! Common types for the dining table environment.

use serde::{Deserialize, Serialize};

/// 1-based identifier of a philosopher, as printed in event lines.
///
/// Seat `i` (0-based) is occupied by philosopher `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhilosopherId(pub u32);

impl PhilosopherId {
    /// Returns the id of the philosopher sitting at a 0-based seat.
    pub fn from_seat(seat: usize) -> Self {
        Self(seat as u32 + 1)
    }

    /// Returns the 0-based seat index, or `None` for the invalid id 0.
    pub fn seat(&self) -> Option<usize> {
        self.0.checked_sub(1).map(|seat| seat as usize)
    }

    /// Even ids reach for their right fork first.
    pub fn is_even(&self) -> bool {
        self.0 % 2 == 0
    }
}

impl std::fmt::Display for PhilosopherId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
