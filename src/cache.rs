use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Clone)]
struct CachedResponse {
    body: String,
    stored_at: Instant,
}

/// Whole-response cache keyed by `path?query`.
///
/// Contract: entries are served until they are `ttl` old, then dropped on the
/// next lookup. There is no invalidation hook — writes elsewhere in the system
/// do not evict anything, so staleness is bounded purely by the TTL. Memory is
/// bounded by the LRU capacity.
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<LruCache<String, CachedResponse>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least one");
        Self {
            ttl,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.lock();
        let fresh = entries
            .get(key)
            .and_then(|entry| (entry.stored_at.elapsed() < self.ttl).then(|| entry.body.clone()));
        if fresh.is_none() {
            entries.pop(key);
        }
        fresh
    }

    pub fn put(&self, key: String, body: String) {
        self.lock().put(
            key,
            CachedResponse {
                body,
                stored_at: Instant::now(),
            },
        );
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, CachedResponse>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
