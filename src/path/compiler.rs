//! Compiled path cache
//!
//! Parsing is cheap but paths are highly repetitive (the same few
//! expressions with different indices), so parsed paths are kept in a
//! bounded LRU cache shared by every session of a registry.

use super::parser::{parse, LocationPath};
use crate::error::{Error, Result};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Thread-safe LRU cache of parsed paths
#[derive(Debug)]
pub struct PathCache {
    inner: Mutex<LruCache<String, Arc<LocationPath>>>,
}

impl PathCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        PathCache {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Parse `path`, reusing an earlier parse of the same text
    pub fn compile(&self, path: &str) -> Result<Arc<LocationPath>> {
        if let Ok(mut cache) = self.inner.lock() {
            if let Some(compiled) = cache.get(path) {
                return Ok(Arc::clone(compiled));
            }
        }

        let compiled = Arc::new(parse(path).map_err(|reason| Error::invalid_path(path, reason))?);

        // A poisoned cache only costs a re-parse next time
        if let Ok(mut cache) = self.inner.lock() {
            cache.put(path.to_string(), Arc::clone(&compiled));
        }
        Ok(compiled)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.clear();
        }
    }
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(
            NonZeroUsize::new(crate::config::DEFAULT_PATH_CACHE_CAPACITY)
                .unwrap_or(NonZeroUsize::MIN),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_caches() {
        let cache = PathCache::default();
        let a = cache.compile("/plane/wings/wing[1]").unwrap();
        let b = cache.compile("/plane/wings/wing[1]").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction() {
        let cache = PathCache::new(NonZeroUsize::MIN.saturating_add(1));
        cache.compile("/a").unwrap();
        cache.compile("/b").unwrap();
        cache.compile("/c").unwrap();
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalid_path_not_cached() {
        let cache = PathCache::default();
        let err = cache.compile("/a/b#").unwrap_err();
        assert_eq!(err.code(), 7);
        assert!(cache.is_empty());
    }
}
