//! Ordered map type for ZON objects.
//!
//! [`ZonMap`] wraps an [`IndexMap`] and exposes only what the codec needs:
//! the decoder preserves the order fields appeared in the input, while the
//! encoder asks for [`ZonMap::sorted_keys`] to emit the canonical
//! code-point ordering. Insertion order therefore never leaks into
//! canonical output but survives for callers that inspect a decoded tree.
//!
//! Equality is order-independent: two maps with the same key/value pairs
//! compare equal regardless of insertion order, which is the notion of
//! value equality the round-trip guarantees are stated in.
//!
//! ## Examples
//!
//! ```rust
//! use zon::{Value, ZonMap};
//!
//! let mut map = ZonMap::new();
//! map.insert("zebra".to_string(), Value::from(1));
//! map.insert("apple".to_string(), Value::from(2));
//!
//! let decoded_order: Vec<_> = map.keys().collect();
//! assert_eq!(decoded_order, ["zebra", "apple"]);
//! assert_eq!(map.sorted_keys(), ["apple", "zebra"]);
//! ```

use indexmap::IndexMap;

/// An insertion-ordered map of string keys to ZON values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZonMap {
    entries: IndexMap<String, crate::Value>,
}

impl ZonMap {
    /// Creates an empty `ZonMap`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned.
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.entries.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.entries.get(key)
    }

    /// Returns `true` if the map contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut crate::Value> {
        self.entries.get_mut(key)
    }

    /// Returns the number of elements in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns an iterator over the key-value pairs of the map, in
    /// insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &crate::Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The keys in ascending code-point order: the order the encoder emits
    /// object fields and table columns in.
    #[must_use]
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        keys
    }
}

impl IntoIterator for ZonMap {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, crate::Value)> for ZonMap {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        ZonMap {
            entries: IndexMap::from_iter(iter),
        }
    }
}
