// Time-bounded cache for loaded player data.
//
// The caller owns the cache and supplies the clock, so expiry is
// deterministic under test.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::player::Player;

pub const DEFAULT_TTL_SECS: i64 = 300;

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    loaded_at: DateTime<Utc>,
}

/// Holds one value for at most `ttl` after it was loaded.
#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    ttl: Duration,
    entry: Option<Entry<T>>,
}

pub type PlayerCache = TtlCache<Vec<Player>>;

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        TtlCache { ttl, entry: None }
    }

    pub fn with_ttl_secs(secs: i64) -> Self {
        Self::new(Duration::seconds(secs))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether a value is held and younger than the TTL at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|e| now.signed_duration_since(e.loaded_at) < self.ttl)
    }

    /// The cached value if still fresh.
    pub fn get(&self, now: DateTime<Utc>) -> Option<&T> {
        if self.is_fresh(now) {
            self.entry.as_ref().map(|e| &e.value)
        } else {
            None
        }
    }

    pub fn insert(&mut self, now: DateTime<Utc>, value: T) -> &T {
        &self
            .entry
            .insert(Entry {
                value,
                loaded_at: now,
            })
            .value
    }

    /// Return the fresh value, or run `load` and cache its result.
    ///
    /// When `load` fails the previous (stale) entry is kept and the error is
    /// returned.
    pub fn get_or_load<E, F>(&mut self, now: DateTime<Utc>, load: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let fresh = self.is_fresh(now);
        let entry = match self.entry.take() {
            Some(entry) if fresh => entry,
            stale => match load() {
                Ok(value) => {
                    debug!("cache refreshed");
                    Entry {
                        value,
                        loaded_at: now,
                    }
                }
                Err(e) => {
                    self.entry = stale;
                    return Err(e);
                }
            },
        };
        Ok(&self.entry.insert(entry).value)
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

impl<T> Default for TtlCache<T> {
    fn default() -> Self {
        Self::with_ttl_secs(DEFAULT_TTL_SECS)
    }
}
