//! The forks on the table.

use crate::error::DinnerError;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One fork held by a philosopher. Dropping it puts the fork back.
#[derive(Debug)]
pub struct HeldFork {
    index: usize,
    _guard: OwnedMutexGuard<()>,
}

impl HeldFork {
    pub fn index(&self) -> usize {
        self.index
    }
}

/// N exclusive forks; fork `i` sits between seats `i - 1` and `i`.
#[derive(Debug)]
pub struct ForkSet {
    forks: Vec<Arc<Mutex<()>>>,
}

impl ForkSet {
    /// Lays `count` forks on the table.
    pub fn new(count: usize) -> Result<Self, DinnerError> {
        if count == 0 {
            return Err(DinnerError::ResourceInit(
                "a table needs at least one fork".to_string(),
            ));
        }
        let forks = (0..count).map(|_| Arc::new(Mutex::new(()))).collect();
        Ok(Self { forks })
    }

    pub fn len(&self) -> usize {
        self.forks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forks.is_empty()
    }

    /// Waits until fork `index` is free and takes it.
    ///
    /// Waiters are served in FIFO order.
    pub async fn acquire(&self, index: usize) -> HeldFork {
        let guard = Arc::clone(&self.forks[index]).lock_owned().await;
        HeldFork {
            index,
            _guard: guard,
        }
    }

    /// Takes fork `index` only if nobody holds it.
    pub fn try_acquire(&self, index: usize) -> Option<HeldFork> {
        Arc::clone(&self.forks[index])
            .try_lock_owned()
            .ok()
            .map(|guard| HeldFork {
                index,
                _guard: guard,
            })
    }

    /// Puts a fork back on the table.
    pub fn release(&self, fork: HeldFork) {
        drop(fork);
    }

    /// True if every fork can be taken right now.
    pub fn all_free(&self) -> bool {
        let held: Vec<_> = (0..self.len()).map(|i| self.try_acquire(i)).collect();
        held.iter().all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_table_is_rejected() {
        assert!(matches!(ForkSet::new(0), Err(DinnerError::ResourceInit(_))));
    }

    #[tokio::test]
    async fn test_fork_is_exclusive() {
        let forks = ForkSet::new(3).unwrap();

        let held = forks.acquire(1).await;
        assert_eq!(held.index(), 1);
        assert!(forks.try_acquire(1).is_none());
        assert!(!forks.all_free());

        forks.release(held);
        assert!(forks.try_acquire(1).is_some());
        assert!(forks.all_free());
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_waits_for_release() {
        let forks = Arc::new(ForkSet::new(2).unwrap());
        let held = forks.acquire(0).await;

        let waiter = {
            let forks = Arc::clone(&forks);
            tokio::spawn(async move { forks.acquire(0).await.index() })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        drop(held);
        assert_eq!(waiter.await.unwrap(), 0);
        assert!(forks.all_free());
    }
}
