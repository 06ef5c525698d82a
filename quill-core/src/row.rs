use crate::Value;
use std::collections::HashMap;

/// Ordered map of a row, keys compare ignoring case.
///
/// Iteration follows insertion order and yields the casing of the first
/// insertion of each key. Inserting an existing key again replaces the value
/// in place.
///
/// ```rust
/// use quill_core::{RowMap, Value};
/// let mut row = RowMap::new();
/// row.insert("U_Name", Value::from("jane"));
/// assert_eq!(row.get("u_name"), row.get("U_NAME"));
/// assert_eq!(row.keys().next(), Some("U_Name"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowMap {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl RowMap {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the previous value of the key, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        let folded = key.to_lowercase();
        if let Some(&i) = self.index.get(&folded) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.index.insert(folded, self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.position(key).map(|i| &mut self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let i = self.index.remove(&key.to_lowercase())?;
        let (_, value) = self.entries.remove(i);
        for position in self.index.values_mut() {
            if *position > i {
                *position -= 1;
            }
        }
        Some(value)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.index.get(&key.to_lowercase()).copied()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RowMap {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        let mut result = RowMap::new();
        for (k, v) in iter {
            result.insert(k, v);
        }
        result
    }
}

impl IntoIterator for RowMap {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
