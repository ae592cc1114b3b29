//! Name Interning Pool
//!
//! Element, attribute and PI names are interned once per document so that
//! nodes carry a `u32` and name comparisons in the path evaluator are
//! integer compares.
//!
//! Uses hash-based lookup to avoid storing duplicate string data.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Name interning pool. Id 0 is the empty string.
#[derive(Debug, Clone)]
pub struct NamePool {
    /// Names indexed by id
    entries: Vec<Box<str>>,
    /// Hash of name -> ids with that hash (handles rare collisions)
    hash_index: HashMap<u64, Vec<u32>>,
}

impl Default for NamePool {
    fn default() -> Self {
        Self::new()
    }
}

impl NamePool {
    pub fn new() -> Self {
        let mut entries = Vec::with_capacity(64);
        entries.push(Box::from(""));
        NamePool {
            entries,
            hash_index: HashMap::new(),
        }
    }

    #[inline]
    fn compute_hash(s: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Intern `s`, returning its id
    pub fn intern(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }
        if let Some(id) = self.lookup(s) {
            return id;
        }

        let id = self.entries.len() as u32;
        self.entries.push(Box::from(s));
        self.hash_index
            .entry(Self::compute_hash(s))
            .or_default()
            .push(id);
        id
    }

    /// Id of an already interned name
    pub fn lookup(&self, s: &str) -> Option<u32> {
        if s.is_empty() {
            return Some(0);
        }
        self.hash_index
            .get(&Self::compute_hash(s))?
            .iter()
            .copied()
            .find(|&id| &*self.entries[id as usize] == s)
    }

    /// Name for `id`, empty for unknown ids
    #[inline]
    pub fn get(&self, id: u32) -> &str {
        self.entries.get(id as usize).map(|s| &**s).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut pool = NamePool::new();
        let a = pool.intern("wing");
        let b = pool.intern("wing");
        let c = pool.intern("fuselage");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(pool.get(a), "wing");
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_empty_and_unknown() {
        let mut pool = NamePool::new();
        assert_eq!(pool.intern(""), 0);
        assert_eq!(pool.get(0), "");
        assert_eq!(pool.get(99), "");
        assert!(pool.is_empty());
    }

    #[test]
    fn test_lookup_without_interning() {
        let mut pool = NamePool::new();
        let id = pool.intern("uID");
        assert_eq!(pool.lookup("uID"), Some(id));
        assert_eq!(pool.lookup("isLink"), None);
    }
}
