//! Per-philosopher state shared with the watchdog.

use philo_env::PhilosopherId;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

/// A place at the table.
///
/// `last_meal` is written only by the philosopher sitting here and read by
/// the watchdog, so it lives in an atomic (microseconds since start).
#[derive(Debug)]
pub struct Seat {
    pub id: PhilosopherId,
    pub left_fork: usize,
    pub right_fork: usize,
    last_meal_us: AtomicU64,
    meals_eaten: AtomicU32,
    finished: AtomicBool,
}

impl Seat {
    /// Seat `index` of a table with `count` seats.
    pub fn new(index: usize, count: usize) -> Self {
        Self {
            id: PhilosopherId::from_seat(index),
            left_fork: index,
            right_fork: (index + 1) % count,
            last_meal_us: AtomicU64::new(0),
            meals_eaten: AtomicU32::new(0),
            finished: AtomicBool::new(false),
        }
    }

    /// The order in which this philosopher reaches for its forks.
    ///
    /// Even ids take the right fork first, odd ids the left one, which
    /// breaks the circular wait.
    pub fn fork_order(&self) -> (usize, usize) {
        if self.id.is_even() {
            (self.right_fork, self.left_fork)
        } else {
            (self.left_fork, self.right_fork)
        }
    }

    pub fn record_meal_start(&self, now: Duration) {
        self.last_meal_us.store(now.as_micros() as u64, Ordering::Release);
    }

    pub fn last_meal(&self) -> Duration {
        Duration::from_micros(self.last_meal_us.load(Ordering::Acquire))
    }

    /// Time elapsed since the last meal started (or since the dinner began).
    pub fn hungry_for(&self, now: Duration) -> Duration {
        now.saturating_sub(self.last_meal())
    }

    /// Counts one finished meal and returns the new total.
    pub fn finish_meal(&self) -> u32 {
        self.meals_eaten.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn meals_eaten(&self) -> u32 {
        self.meals_eaten.load(Ordering::Acquire)
    }

    /// Marks this philosopher as done with the meal goal.
    pub fn mark_finished(&self) {
        self.finished.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forks_wrap_around() {
        let last = Seat::new(4, 5);
        assert_eq!(last.id, PhilosopherId(5));
        assert_eq!((last.left_fork, last.right_fork), (4, 0));
    }

    #[test]
    fn test_fork_order_by_parity() {
        // id 1: left first
        assert_eq!(Seat::new(0, 4).fork_order(), (0, 1));
        // id 2: right first
        assert_eq!(Seat::new(1, 4).fork_order(), (2, 1));
        // id 4: right first, wrapping
        assert_eq!(Seat::new(3, 4).fork_order(), (0, 3));
    }

    #[test]
    fn test_hunger_and_meals() {
        let seat = Seat::new(0, 2);
        assert_eq!(seat.hungry_for(Duration::from_millis(150)), Duration::from_millis(150));

        seat.record_meal_start(Duration::from_millis(100));
        assert_eq!(seat.hungry_for(Duration::from_millis(150)), Duration::from_millis(50));
        assert_eq!(seat.hungry_for(Duration::from_millis(50)), Duration::ZERO);

        assert_eq!(seat.finish_meal(), 1);
        assert_eq!(seat.finish_meal(), 2);
        assert_eq!(seat.meals_eaten(), 2);

        assert!(!seat.is_finished());
        seat.mark_finished();
        assert!(seat.is_finished());
    }
}
