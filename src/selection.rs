//! The set of currently selected regions.
use crate::region::{RegionCategory, RegionKey};
use indexmap::IndexSet;

/// Holds the selected [`RegionKey`]s for a session.
///
/// Membership is the only observable property for most callers, but the store remembers the order
/// in which keys were selected so that municipality colours can follow selection order. Every
/// operation is idempotent and none can fail; keys without data are dropped later, at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionStore {
    keys: IndexSet<RegionKey>,
}

impl Default for SelectionStore {
    /// A store holding only the aggregate region
    fn default() -> Self {
        Self {
            keys: IndexSet::from([RegionKey::Aggregate]),
        }
    }
}

impl SelectionStore {
    /// Create a store with the default selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding no keys
    pub fn empty() -> Self {
        Self {
            keys: IndexSet::new(),
        }
    }

    /// Select `key`
    pub fn add(&mut self, key: RegionKey) {
        self.keys.insert(key);
    }

    /// Deselect `key`, preserving the selection order of the remaining keys
    pub fn remove(&mut self, key: &RegionKey) {
        self.keys.shift_remove(key);
    }

    /// Flip the selection state of `key`, returning whether it is now selected
    pub fn toggle(&mut self, key: RegionKey) -> bool {
        if self.keys.shift_remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// Deselect every key in `category`, or every key if `category` is `None`
    pub fn clear(&mut self, category: Option<RegionCategory>) {
        match category {
            None => self.keys.clear(),
            Some(category) => self.keys.retain(|key| key.category() != category),
        }
    }

    /// Select every key in `keys`
    pub fn select_all<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = RegionKey>,
    {
        self.keys.extend(keys);
    }

    /// Whether `key` is selected
    pub fn contains(&self, key: &RegionKey) -> bool {
        self.keys.contains(key)
    }

    /// All selected keys, in selection order
    pub fn all(&self) -> &IndexSet<RegionKey> {
        &self.keys
    }

    /// The number of selected keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
