//! Bounded, TTL-based memo of evaluation results.
//!
//! Entries are keyed by the expression text plus a tagged serialization of the
//! variable bindings (see [`cache_key`]). Size accounting is approximate: an
//! entry costs its key length plus [`Value::approx_size`]. When an insert would
//! push the total over the limit, the oldest insertions are evicted first.
//! Expired entries are dropped lazily by [`ResultCache::get`] and eagerly by
//! [`ResultCache::purge_expired`], which the engine runs periodically.
//!
//! Time is read from `tokio::time::Instant`, so tests can drive expiry with a
//! paused clock.

use crate::values::{Value, Variables};
use core::fmt::Write;
use hashbrown::HashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[cfg(test)]
mod cache_test;

/// Interval between background sweeps of expired entries.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("entry of {size} bytes exceeds cache capacity of {max} bytes")]
    EntryTooLarge { size: usize, max: usize },
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Value,
    pub inserted_at: Instant,
    pub expires_at: Instant,
    pub approx_size: usize,
}

/// Counters reported by [`ResultCache::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub size_bytes: usize,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    // Keys in insertion order; every key here is present in `entries`.
    order: VecDeque<String>,
    size: usize,
    hits: u64,
    misses: u64,
}

impl CacheState {
    fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.size -= entry.approx_size;
        if let Some(index) = self.order.iter().position(|k| k == key) {
            self.order.remove(index);
        }
        Some(entry)
    }

    fn pop_oldest(&mut self) -> Option<(String, CacheEntry)> {
        let key = self.order.pop_front()?;
        let entry = self.entries.remove(&key)?;
        self.size -= entry.approx_size;
        Some((key, entry))
    }
}

pub struct ResultCache {
    state: Mutex<CacheState>,
    max_size: usize,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            max_size,
            ttl,
        }
    }

    /// Look up a live entry. Expired entries are removed and count as misses.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        let mut state = self.state.lock();

        let live = match state.entries.get(key) {
            Some(entry) if now < entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                state.remove(key);
                tracing::trace!(key, "dropped expired cache entry");
                None
            }
            None => None,
        };

        if live.is_some() {
            state.hits += 1;
        } else {
            state.misses += 1;
        }
        live
    }

    /// Insert or replace an entry, evicting the oldest entries as needed so
    /// the total size stays within capacity.
    pub fn set(&self, key: &str, value: Value) -> Result<(), CacheError> {
        let approx_size = key.len() + value.approx_size();
        if approx_size > self.max_size {
            return Err(CacheError::EntryTooLarge {
                size: approx_size,
                max: self.max_size,
            });
        }

        let now = Instant::now();
        let mut state = self.state.lock();
        state.remove(key);
        while state.size + approx_size > self.max_size {
            match state.pop_oldest() {
                Some((evicted, _)) => tracing::debug!(key = %evicted, "evicted cache entry"),
                None => break,
            }
        }

        state.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                inserted_at: now,
                expires_at: now + self.ttl,
                approx_size,
            },
        );
        state.order.push_back(key.to_string());
        state.size += approx_size;
        Ok(())
    }

    /// Total approximate size of the stored entries, in bytes.
    pub fn size(&self) -> usize {
        self.state.lock().size
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove the least recently inserted entry. Returns `false` if the cache
    /// was empty.
    pub fn evict_oldest(&self) -> bool {
        self.state.lock().pop_oldest().is_some()
    }

    /// Remove every expired entry, returning how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.state.lock();

        let before = state.entries.len();
        state.entries.retain(|_, entry| now < entry.expires_at);
        let CacheState {
            entries, order, ..
        } = &mut *state;
        order.retain(|key| entries.contains_key(key));
        let size = entries.values().map(|e| e.approx_size).sum();
        state.size = size;
        before - state.entries.len()
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.order.clear();
        state.size = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            entries: state.entries.len(),
            size_bytes: state.size,
        }
    }
}

/// Start a task that purges expired entries every `interval`.
///
/// The task holds only a weak reference and stops once the cache is dropped.
/// Returns `None` when called outside a tokio runtime.
pub fn spawn_sweeper(cache: &Arc<ResultCache>, interval: Duration) -> Option<JoinHandle<()>> {
    let handle = tokio::runtime::Handle::try_current().ok()?;
    let weak: Weak<ResultCache> = Arc::downgrade(cache);

    Some(handle.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let Some(cache) = weak.upgrade() else {
                break;
            };
            let purged = cache.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "swept expired cache entries");
            }
        }
    }))
}

/// Cache key for an expression evaluated against `vars`.
///
/// The key starts with the expression's byte length, `<len>:<expr>`, so no
/// expression text can reproduce the key of a different expression or
/// binding set. Bindings follow in name order as `|name=<tagged value>;...`;
/// values with the same display form but different types (`10` and `"10"`)
/// get distinct keys.
pub fn cache_key(expr: &str, vars: &Variables) -> String {
    let mut key = String::with_capacity(expr.len() + 8 + 16 * vars.len());
    // Writing into a String cannot fail.
    let _ = write!(key, "{}:{}", expr.len(), expr);
    if vars.is_empty() {
        return key;
    }

    let mut names: Vec<&String> = vars.keys().collect();
    names.sort();

    key.push('|');
    for name in names {
        let _ = write!(key, "{}=", name);
        let _ = vars[name].write_tagged(&mut key);
        key.push(';');
    }
    key
}
