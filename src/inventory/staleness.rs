//! Cache staleness policy

use crate::inventory::record::CacheState;
use chrono::{DateTime, Duration, Utc};

/// Whether `state` is too old to be trusted at `now`.
///
/// A cache that was never synced is always stale. A zero or negative
/// `interval` makes every cache stale.
pub fn needs_sync(state: &CacheState, interval: Duration, now: DateTime<Utc>) -> bool {
    let Some(last_sync) = state.last_sync else {
        return true;
    };
    let interval = interval.max(Duration::zero());
    now - last_sync >= interval
}

/// Staleness check bound to a configured sync interval
#[derive(Debug, Clone, Copy)]
pub struct StalenessPolicy {
    interval: Duration,
}

impl StalenessPolicy {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Build from a configured number of seconds, saturating at the
    /// largest representable interval
    pub fn from_secs(secs: i64) -> Self {
        let interval = Duration::try_seconds(secs).unwrap_or(if secs < 0 {
            Duration::zero()
        } else {
            Duration::MAX
        });
        Self::new(interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn needs_sync(&self, state: &CacheState, now: DateTime<Utc>) -> bool {
        needs_sync(state, self.interval, now)
    }
}
