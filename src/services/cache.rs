//! Time-bounded memoization of catalog reads.
//!
//! All entries share one deadline. The first access after it passes clears
//! the whole map and starts a new window, so a write becomes visible to
//! cached reads at most one TTL later.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

struct CacheState<K, V> {
    entries: HashMap<K, V>,
    reset_at: Instant,
}

pub struct TtlCache<K, V> {
    name: &'static str,
    ttl: Duration,
    state: Mutex<CacheState<K, V>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// A zero `ttl` disables caching entirely.
    #[must_use]
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                reset_at: deadline_after(Instant::now(), ttl),
            }),
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        if !self.is_enabled() {
            return None;
        }

        let mut state = self.state.lock().await;
        self.expire_if_due(&mut state);
        state.entries.get(key).cloned()
    }

    pub async fn insert(&self, key: K, value: V) {
        if !self.is_enabled() {
            return;
        }

        let mut state = self.state.lock().await;
        self.expire_if_due(&mut state);
        state.entries.insert(key, value);
    }

    /// Returns the cached value or computes, stores and returns a fresh one.
    /// The lock is not held while `compute` runs, so two concurrent misses on
    /// the same key both compute.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            metrics::counter!("catalog_cache_hits_total", "operation" => self.name).increment(1);
            return Ok(value);
        }

        metrics::counter!("catalog_cache_misses_total", "operation" => self.name).increment(1);
        let value = compute().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    pub async fn invalidate_all(&self) {
        let mut state = self.state.lock().await;
        state.entries.clear();
        state.reset_at = deadline_after(Instant::now(), self.ttl);
    }

    pub async fn len(&self) -> usize {
        let mut state = self.state.lock().await;
        self.expire_if_due(&mut state);
        state.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn expire_if_due(&self, state: &mut CacheState<K, V>) {
        let now = Instant::now();
        if now >= state.reset_at {
            state.entries.clear();
            state.reset_at = deadline_after(now, self.ttl);
        }
    }
}

/// Instants past the clock's range clamp to roughly thirty years out.
fn deadline_after(now: Instant, ttl: Duration) -> Instant {
    const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

    now.checked_add(ttl)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}
