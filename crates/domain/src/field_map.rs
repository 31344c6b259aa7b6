//! Insertion-ordered key/value map used for event dicts and bound context.

use crate::json::{JsonView, repr_fallback};
use crate::value::FieldValue;
use serde::{Serialize, Serializer};

/// Ordered string-keyed map.
///
/// Re-inserting an existing key replaces its value in place, so the key keeps
/// its original position. Removing a key shifts later entries forward.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(Box<str>, FieldValue)>,
}

/// The mutable mapping that flows through the processor chain.
pub type EventDict = FieldMap;

impl FieldMap {
    /// Empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Empty map with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| &**existing == key)
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<Box<str>>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(index) => self
                .entries
                .get_mut(index)
                .map(|slot| std::mem::replace(&mut slot.1, value)),
            None => {
                self.entries.push((key, value));
                None
            },
        }
    }

    /// Builder form of [`FieldMap::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<Box<str>>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Borrow a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| &**existing == key)
            .map(|(_, value)| value)
    }

    /// Mutably borrow a value.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.entries
            .iter_mut()
            .find(|(existing, _)| &**existing == key)
            .map(|(_, value)| value)
    }

    /// Returns true when `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        let index = self.position(key)?;
        Some(self.entries.remove(index).1)
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &FieldValue) -> bool) {
        self.entries.retain(|(key, value)| keep(key, value));
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(key, value)| (&**key, value))
    }

    /// Iterate entries mutably in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut FieldValue)> {
        self.entries.iter_mut().map(|(key, value)| (&**key, value))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| &**key)
    }

    /// Merge `other` into `self`; keys from `other` win.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in other.iter() {
            self.insert(key, value.clone());
        }
    }
}

impl<K, V> FromIterator<(K, V)> for FieldMap
where
    K: Into<Box<str>>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for FieldMap
where
    K: Into<Box<str>>,
    V: Into<FieldValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for FieldMap {
    type Item = (Box<str>, FieldValue);
    type IntoIter = std::vec::IntoIter<(Box<str>, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        JsonView::map(self, &repr_fallback).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn insert_replaces_in_place() {
        let mut map = FieldMap::new().with("a", 1).with("b", 2);
        let previous = map.insert("a", "again");
        assert_eq!(previous, Some(FieldValue::Int(1)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a").and_then(FieldValue::as_str), Some("again"));
    }

    #[test]
    fn remove_shifts_later_entries() {
        let mut map: FieldMap = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(map.remove("b"), Some(FieldValue::Int(2)));
        assert_eq!(map.remove("missing"), None);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn merge_lets_the_other_map_win() {
        let mut base = FieldMap::new().with("request_id", "r-1").with("user", "ann");
        let overlay = FieldMap::new().with("user", "bob").with("order_id", "O-1");
        base.merge(&overlay);
        assert_eq!(
            base.keys().collect::<Vec<_>>(),
            vec!["request_id", "user", "order_id"]
        );
        assert_eq!(base.get("user").and_then(FieldValue::as_str), Some("bob"));
    }

    proptest! {
        #[test]
        fn keys_follow_first_insertion_order(keys in proptest::collection::vec("[a-e]{1,2}", 0..24)) {
            let mut map = FieldMap::new();
            let mut expected: Vec<String> = Vec::new();
            for (index, key) in keys.iter().enumerate() {
                map.insert(key.as_str(), index);
                if !expected.contains(key) {
                    expected.push(key.clone());
                }
            }
            let actual: Vec<&str> = map.keys().collect();
            prop_assert_eq!(actual, expected.iter().map(String::as_str).collect::<Vec<_>>());

            let json = serde_json::to_string(&map).map_err(|error| TestCaseError::fail(error.to_string()))?;
            let reparsed: serde_json::Value = serde_json::from_str(&json).map_err(|error| TestCaseError::fail(error.to_string()))?;
            prop_assert_eq!(reparsed.as_object().map_or(0, serde_json::Map::len), map.len());
        }
    }
}
