//! Bounded cache for text deduplication.
//!
//! Tracks how often a text fragment has been seen during one extraction call.
//! Eviction is by insertion order: the oldest inserted key goes first, and
//! neither `get` nor overwriting an existing key refreshes its position.
//! Extraction quality is tuned against this behaviour, so it is kept even
//! though a recency-based cache would be the more common choice.

use std::collections::{HashMap, VecDeque};

/// Insertion-ordered bounded map from text fingerprint to occurrence count.
#[derive(Debug, Clone, Default)]
pub struct DedupCache {
    max_size: usize,
    keys: VecDeque<String>,
    values: HashMap<String, usize>,
}

impl DedupCache {
    /// Create a cache holding at most `max_size` keys. Zero means unbounded.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            keys: VecDeque::new(),
            values: HashMap::new(),
        }
    }

    /// Look up a key without touching eviction order.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<usize> {
        self.values.get(key).copied()
    }

    /// Store a value. Existing keys are overwritten in place; new keys evict
    /// the oldest inserted key when the cache is full.
    pub fn put(&mut self, key: &str, value: usize) {
        if let Some(slot) = self.values.get_mut(key) {
            *slot = value;
            return;
        }

        if self.max_size > 0 && self.keys.len() >= self.max_size {
            if let Some(oldest) = self.keys.pop_front() {
                self.values.remove(&oldest);
            }
        }

        self.keys.push_back(key.to_string());
        self.values.insert(key.to_string(), value);
    }

    /// Drop a key if present.
    pub fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.keys.retain(|k| k != key);
        }
    }

    /// Drop every key.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check whether the cache holds no key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Count one more occurrence of `text` and report whether it was already
    /// seen more than `max_count` times. Texts of `min_size` characters or
    /// fewer are never considered duplicates and are not recorded.
    pub fn check_duplicate(&mut self, text: &str, min_size: usize, max_count: usize) -> bool {
        if text.chars().count() <= min_size {
            return false;
        }
        let count = self.get(text).unwrap_or(0);
        self.put(text, count + 1);
        count > max_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let mut cache = DedupCache::new(4);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_evicts_oldest_inserted() {
        let mut cache = DedupCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn test_get_does_not_refresh_order() {
        let mut cache = DedupCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.get("a"), Some(1));
        cache.put("c", 3);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut cache = DedupCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("a", 10);
        assert_eq!(cache.len(), 2);
        cache.put("c", 3);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cache = DedupCache::new(3);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.remove("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_unbounded() {
        let mut cache = DedupCache::new(0);
        for i in 0..100 {
            cache.put(&i.to_string(), i);
        }
        assert_eq!(cache.len(), 100);
        assert_eq!(cache.get("0"), Some(0));
    }

    #[test]
    fn test_check_duplicate_counts_occurrences() {
        let mut cache = DedupCache::new(16);
        let text = "x".repeat(120);
        assert!(!cache.check_duplicate(&text, 100, 2));
        assert!(!cache.check_duplicate(&text, 100, 2));
        assert!(!cache.check_duplicate(&text, 100, 2));
        assert!(cache.check_duplicate(&text, 100, 2));
    }

    #[test]
    fn test_check_duplicate_ignores_short_text() {
        let mut cache = DedupCache::new(16);
        for _ in 0..10 {
            assert!(!cache.check_duplicate("short", 100, 2));
        }
        assert!(cache.is_empty());
    }
}
