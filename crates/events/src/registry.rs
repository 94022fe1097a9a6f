//! Lazily populated key -> collection map.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// A map whose entries are created on first access.
///
/// [`get`](LazyRegistry::get) never fails: an unknown key is given a fresh
/// `V::default()` which is stored and returned. From then on every `get` for
/// that key hands out the same stored value until [`clear`](LazyRegistry::clear).
#[derive(Debug, Clone)]
pub struct LazyRegistry<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for LazyRegistry<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K, V> LazyRegistry<K, V>
where
    K: Eq + Hash,
    V: Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value for `key`, creating an empty one if none exists yet.
    pub fn get(&mut self, key: K) -> &mut V {
        self.entries.entry(key).or_default()
    }

    /// Look up `key` without creating it.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Drop every key and its value.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}
