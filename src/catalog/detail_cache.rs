use lru::LruCache;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

pub const DEFAULT_DETAIL_CACHE_SIZE: usize = 500;

/// Bounded cache of full problem details, keyed by slug.
pub struct DetailCache {
    entries: Mutex<LruCache<String, Arc<Value>>>,
}

impl DetailCache {
    pub fn new(capacity: NonZeroUsize) -> DetailCache {
        DetailCache {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, slug: &str) -> Option<Arc<Value>> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(slug).cloned()
    }

    pub fn insert(&self, slug: String, detail: Value) -> Arc<Value> {
        let detail = Arc::new(detail);
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.put(slug, detail.clone());
        detail
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl Default for DetailCache {
    fn default() -> Self {
        DetailCache::new(NonZeroUsize::new(DEFAULT_DETAIL_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn evicts_least_recently_used() {
        let cache = DetailCache::new(NonZeroUsize::new(2).unwrap());
        cache.insert("a".to_string(), json!({"slug": "a"}));
        cache.insert("b".to_string(), json!({"slug": "b"}));
        assert!(cache.get("a").is_some());

        cache.insert("c".to_string(), json!({"slug": "c"}));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("b").is_none());
        assert_eq!(cache.get("a").unwrap()["slug"], "a");
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn clear_empties_cache() {
        let cache = DetailCache::default();
        cache.insert("a".to_string(), json!({}));
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
