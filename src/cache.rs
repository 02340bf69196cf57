use std::collections::HashMap;

use crate::classify::Classification;

/// Bounded cache of classifications keyed by raw SQL text
///
/// Owned by a [`SqlClassifier`](crate::classify::SqlClassifier); there is no
/// process-wide instance. Entries are keyed by the full text, so distinct
/// texts never share an entry.
#[derive(Debug)]
pub struct ClassificationCache {
    cache:    HashMap<Box<str>, Classification>,
    max_size: usize
}

impl ClassificationCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::with_capacity(max_size.min(1024)),
            max_size
        }
    }

    pub fn get(&self, sql: &str) -> Option<Classification> {
        self.cache.get(sql).cloned()
    }

    pub fn insert(&mut self, sql: &str, classification: Classification) {
        if self.max_size == 0 {
            return;
        }
        // Simple eviction: clear half when full
        if self.cache.len() >= self.max_size && !self.cache.contains_key(sql) {
            let keys: Vec<Box<str>> = self
                .cache
                .keys()
                .take(self.max_size.div_ceil(2))
                .cloned()
                .collect();
            for key in keys {
                self.cache.remove(&key);
            }
        }

        self.cache.insert(sql.into(), classification);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
