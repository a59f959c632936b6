use std::future::Future;
use std::sync::RwLock;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
struct Entry<P> {
    provider: P,
    chosen_at: Instant,
    valid_until: Instant,
    /// False while the entry is an optimistic cold-start choice that a
    /// health check has not yet confirmed.
    confirmed: bool,
}

/// Per-capability-family record of the currently active provider.
///
/// Reads take a shared lock and never touch the network. Writes happen only
/// during (re)selection. Revalidation is single-flight: while one caller runs
/// a health pass, callers holding a stale value return it immediately and
/// cold callers block on the same in-flight pass instead of starting another.
pub struct SelectionCache<P> {
    entry: RwLock<Option<Entry<P>>>,
    revalidation: Mutex<()>,
}

impl<P: Copy> SelectionCache<P> {
    pub fn new() -> Self {
        Self {
            entry: RwLock::new(None),
            revalidation: Mutex::new(()),
        }
    }

    /// The cached provider, if its validity window has not elapsed.
    pub fn fresh(&self) -> Option<P> {
        let entry = self.entry.read().expect("selection cache lock poisoned");
        (*entry)
            .filter(|e| Instant::now() < e.valid_until)
            .map(|e| e.provider)
    }

    /// The most recent choice regardless of expiry.
    pub fn last_known(&self) -> Option<P> {
        let entry = self.entry.read().expect("selection cache lock poisoned");
        (*entry).map(|e| e.provider)
    }

    /// True when no selection has been made since startup or the last clear.
    pub fn is_cold(&self) -> bool {
        self.entry
            .read()
            .expect("selection cache lock poisoned")
            .is_none()
    }

    /// True once the current entry was written from health-check results.
    pub fn is_confirmed(&self) -> bool {
        let entry = self.entry.read().expect("selection cache lock poisoned");
        (*entry).map(|e| e.confirmed).unwrap_or(false)
    }

    /// Record a health-checked selection valid for `ttl`.
    pub fn store(&self, provider: P, ttl: Duration) {
        self.write(provider, ttl, true);
    }

    /// Record an optimistic selection that still awaits confirmation.
    pub fn prime(&self, provider: P, ttl: Duration) {
        self.write(provider, ttl, false);
    }

    fn write(&self, provider: P, ttl: Duration, confirmed: bool) {
        let chosen_at = Instant::now();
        let new_entry = Entry {
            provider,
            chosen_at,
            valid_until: chosen_at + ttl,
            confirmed,
        };
        debug_assert!(new_entry.valid_until > new_entry.chosen_at);
        let mut entry = self.entry.write().expect("selection cache lock poisoned");
        *entry = Some(new_entry);
    }

    /// Reset to the cold state, forcing re-selection on next use.
    pub fn clear(&self) {
        let mut entry = self.entry.write().expect("selection cache lock poisoned");
        *entry = None;
    }

    pub async fn lock_revalidation(&self) -> MutexGuard<'_, ()> {
        self.revalidation.lock().await
    }

    /// Re-run selection with single-flight semantics.
    ///
    /// The first caller past the freshness check runs `probe` and stores the
    /// result for `ttl`. Concurrent callers that still hold an expired value
    /// return it rather than waiting; callers with no value at all wait for
    /// the in-flight probe and then read its result.
    pub async fn revalidate_with<F, Fut>(&self, ttl: Duration, probe: F) -> P
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = P>,
    {
        if let Some(provider) = self.fresh() {
            return provider;
        }

        if let Some(previous) = self.last_known() {
            let Ok(_guard) = self.revalidation.try_lock() else {
                // A revalidation is already in flight. Slight staleness beats
                // a duplicate health pass.
                return previous;
            };
            if let Some(provider) = self.fresh() {
                return provider;
            }
            let chosen = probe().await;
            self.store(chosen, ttl);
            return chosen;
        }

        let _guard = self.revalidation.lock().await;
        if let Some(provider) = self.fresh() {
            return provider;
        }
        let chosen = probe().await;
        self.store(chosen, ttl);
        chosen
    }
}

impl<P: Copy> Default for SelectionCache<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn fresh_returns_none_after_ttl_elapses() {
        let cache = SelectionCache::new();
        cache.store("a", Duration::from_secs(60));
        assert_eq!(cache.fresh(), Some("a"));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.fresh(), None);
        assert_eq!(cache.last_known(), Some("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn revalidate_runs_probe_once_for_concurrent_stale_readers() {
        let cache = Arc::new(SelectionCache::new());
        cache.store("old", Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(11)).await;

        let probes = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..50 {
            let cache = cache.clone();
            let probes = probes.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .revalidate_with(Duration::from_secs(10), || async move {
                        probes.fetch_add(1, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        "new"
                    })
                    .await
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        assert_eq!(probes.load(Ordering::SeqCst), 1);
        // Everyone got either the stale value or the probe result, never a
        // panic or a second probe.
        assert!(results.iter().all(|r| *r == "old" || *r == "new"));
        assert_eq!(cache.fresh(), Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn cold_readers_wait_for_the_inflight_probe() {
        let cache: Arc<SelectionCache<&str>> = Arc::new(SelectionCache::new());
        let probes = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let probes = probes.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .revalidate_with(Duration::from_secs(10), || async move {
                        probes.fetch_add(1, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        "chosen"
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), "chosen");
        }
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_resets_to_cold() {
        let cache = SelectionCache::new();
        cache.prime("a", Duration::from_secs(60));
        assert!(!cache.is_cold());
        assert!(!cache.is_confirmed());

        cache.store("a", Duration::from_secs(60));
        assert!(cache.is_confirmed());

        cache.clear();
        assert!(cache.is_cold());
        assert_eq!(cache.fresh(), None);
        assert_eq!(cache.last_known(), None);
    }
}
