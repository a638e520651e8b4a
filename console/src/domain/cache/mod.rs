//! Explicit query cache shared by every resource client.
//!
//! Entries are typed values keyed by [`CacheKey`]. Reads classify an entry as
//! fresh or stale; stale entries are refetched by the caller. Two counters
//! order concurrent writers against invalidation and reset:
//!
//! - `generation` increases on every [`QueryCache::invalidate`]. A value whose
//!   request was issued before a matching invalidation is stored but stays
//!   stale.
//! - `epoch` increases on every [`QueryCache::reset`]. A value whose request
//!   was issued in an earlier epoch is discarded, so no data from a previous
//!   session survives logout.
//!
//! Among writes that are accepted, the last one received wins.

mod key;

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tokio::sync::broadcast;
use tracing::debug;

pub use key::{CacheKey, CachePrefix};

const EVENT_CAPACITY: usize = 64;

/// Snapshot of the cache counters, captured when a request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheVersion {
    /// Reset counter.
    pub epoch: u64,
    /// Invalidation counter.
    pub generation: u64,
}

/// Result of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    /// Entry present and usable without refetching.
    Fresh(T),
    /// Entry present but invalidated or older than the max age.
    Stale(T),
    /// No entry of the requested type.
    Miss,
}

impl<T> CacheLookup<T> {
    /// Value when the entry is fresh.
    #[must_use]
    pub fn fresh(self) -> Option<T> {
        match self {
            Self::Fresh(value) => Some(value),
            Self::Stale(_) | Self::Miss => None,
        }
    }
}

/// What happened to a value handed to [`QueryCache::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// Stored and fresh.
    Stored,
    /// Stored, but an invalidation happened after the request was issued.
    StoredStale,
    /// Dropped because the cache was reset after the request was issued.
    Discarded,
}

/// Notifications published to cache subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A value was stored under `key`.
    Stored {
        /// Key written.
        key: CacheKey,
    },
    /// Entries under `prefix` were marked stale.
    Invalidated {
        /// Prefix invalidated.
        prefix: CachePrefix,
        /// Number of entries affected.
        entries: usize,
    },
    /// Every entry was dropped.
    Reset,
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    stored_at: DateTime<Utc>,
    stale: bool,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, Entry>,
    invalidations: HashMap<CachePrefix, u64>,
    epoch: u64,
    generation: u64,
}

impl CacheState {
    fn invalidated_since(&self, key: &CacheKey, generation: u64) -> bool {
        self.invalidations
            .iter()
            .any(|(prefix, at)| *at > generation && key.matches(prefix))
    }
}

/// In-process cache of decoded query results.
pub struct QueryCache {
    state: Mutex<CacheState>,
    clock: Arc<dyn Clock + Send + Sync>,
    max_age: TimeDelta,
    events: broadcast::Sender<CacheEvent>,
}

impl QueryCache {
    /// Create an empty cache whose entries go stale after `max_age`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock + Send + Sync>, max_age: TimeDelta) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(CacheState::default()),
            clock,
            max_age,
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: CacheEvent) {
        // No receivers is the normal case outside interactive views.
        let _ = self.events.send(event);
    }

    /// Counters to capture before issuing a request.
    #[must_use]
    pub fn version(&self) -> CacheVersion {
        let state = self.lock();
        CacheVersion {
            epoch: state.epoch,
            generation: state.generation,
        }
    }

    /// Read the entry under `key` as a `T`.
    #[must_use]
    pub fn get<T>(&self, key: &CacheKey) -> CacheLookup<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let state = self.lock();
        let Some(entry) = state.entries.get(key) else {
            return CacheLookup::Miss;
        };
        let Some(value) = entry.value.downcast_ref::<T>() else {
            return CacheLookup::Miss;
        };
        let expired = self.clock.utc() - entry.stored_at > self.max_age;
        if entry.stale || expired {
            CacheLookup::Stale(value.clone())
        } else {
            CacheLookup::Fresh(value.clone())
        }
    }

    /// Store `value` under `key` for a request issued at `issued`.
    pub fn put<T>(&self, key: CacheKey, value: T, issued: CacheVersion) -> PutOutcome
    where
        T: Send + Sync + 'static,
    {
        let outcome = {
            let mut state = self.lock();
            if issued.epoch != state.epoch {
                debug!(key = %key, "discarding response issued before cache reset");
                return PutOutcome::Discarded;
            }
            let stale = state.invalidated_since(&key, issued.generation);
            state.entries.insert(
                key.clone(),
                Entry {
                    value: Arc::new(value),
                    stored_at: self.clock.utc(),
                    stale,
                },
            );
            if stale {
                PutOutcome::StoredStale
            } else {
                PutOutcome::Stored
            }
        };
        debug!(key = %key, ?outcome, "cache entry stored");
        self.publish(CacheEvent::Stored { key });
        outcome
    }

    /// Mark every entry under `prefix` stale, including responses still in
    /// flight. Returns the number of stored entries affected.
    pub fn invalidate(&self, prefix: &CachePrefix) -> usize {
        let entries = {
            let mut state = self.lock();
            state.generation += 1;
            let generation = state.generation;
            state.invalidations.insert(prefix.clone(), generation);
            let mut affected = 0;
            for (key, entry) in &mut state.entries {
                if key.matches(prefix) {
                    entry.stale = true;
                    affected += 1;
                }
            }
            affected
        };
        debug!(prefix = %prefix, entries, "cache invalidated");
        self.publish(CacheEvent::Invalidated {
            prefix: prefix.clone(),
            entries,
        });
        entries
    }

    /// Drop every entry and discard responses still in flight.
    pub fn reset(&self) {
        {
            let mut state = self.lock();
            state.entries.clear();
            state.invalidations.clear();
            state.epoch += 1;
        }
        debug!("cache reset");
        self.publish(CacheEvent::Reset);
    }

    /// Subscribe to cache notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Number of stored entries, fresh or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}
