use crate::domain::ports::ChainClock;
use crate::domain::value::Timestamp;
use crate::error::{FaucetError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Chain time driven explicitly, e.g. by block timestamps of replayed calls.
///
/// Clones share the same time, so one handle can be given to the service while
/// another advances it. Time never moves backwards.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start.secs())),
        }
    }

    /// Moves chain time to `at`. Fails if `at` is earlier than the current time.
    pub fn advance_to(&self, at: Timestamp) -> Result<()> {
        self.now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (at.secs() >= current).then_some(at.secs())
            })
            .map(|_| ())
            .map_err(|current| FaucetError::ClockRegression {
                current: Timestamp::new(current),
                requested: at,
            })
    }

    /// Moves chain time forward by `secs`, saturating at the maximum.
    pub fn increase(&self, secs: u64) -> Timestamp {
        let previous = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(secs))
            })
            .unwrap_or_else(|current| current);
        Timestamp::new(previous.saturating_add(secs))
    }
}

impl ChainClock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.now.load(Ordering::SeqCst))
    }
}
