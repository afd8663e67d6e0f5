use std::collections::HashMap;
use std::collections::hash_map;

use zoner_api::Value;

/// Key → last-seen value table shared by one traversal.
///
/// No eviction, no size bound, no locking. Values written at an outer depth
/// become visible to every field visited afterwards; the most recent write
/// for a key wins.
#[derive(Debug, Clone, Default)]
pub struct ValueCache {
    entries: HashMap<String, Value>,
}

impl ValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub fn put(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.entries.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ValueCache {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut cache = ValueCache::new();
        cache.extend(iter);
        cache
    }
}

impl<K: Into<String>> Extend<(K, Value)> for ValueCache {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut cache = ValueCache::new();
        assert_eq!(cache.put("xyzId", Value::from("C1")), None);
        assert_eq!(cache.put("xyzId", Value::from("C2")), Some(Value::from("C1")));
        assert_eq!(cache.get("xyzId"), Some(&Value::from("C2")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn seeded_from_pairs() {
        let cache: ValueCache = [("a", Value::Int(1)), ("b", Value::Null)].into_iter().collect();
        assert!(cache.contains_key("b"));
        assert_eq!(cache.get("a"), Some(&Value::Int(1)));
        assert_eq!(cache.get("c"), None);
    }
}
