//! Multi-value header and query representations.
//!
//! Every header or query value handled by the bridge is "one or many strings". Header names
//! keep the casing they arrived with, but all lookups and replacements are case-insensitive,
//! so `Cookie` and `cookie` always address the same entry.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// A header or query value that may legitimately repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Collapses a list of values: empty lists yield `None`, single values become `One`.
    #[must_use]
    pub fn from_values(mut values: Vec<String>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(Self::One),
            _ => Some(Self::Many(values)),
        }
    }

    /// All values in arrival order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }

    /// Appends a value, promoting `One` to `Many`.
    pub fn push(&mut self, value: String) {
        match self {
            Self::One(first) => {
                let first = std::mem::take(first);
                *self = Self::Many(vec![first, value]);
            }
            Self::Many(values) => values.push(value),
        }
    }

    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        self.values().join(separator)
    }
}

impl From<String> for OneOrMany {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

/// Header mapping with case-insensitive lookup and case-preserving storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct HeaderMap(BTreeMap<String, OneOrMany>);

impl HeaderMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OneOrMany> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Returns the first value stored under `name`.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|value| value.values().first())
            .map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Stores `value` under `name`, replacing every entry whose name differs only in case.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OneOrMany>) -> Option<OneOrMany> {
        let name = name.into();
        let previous = self.remove(&name);
        self.0.insert(name, value.into());
        previous
    }

    /// Adds one more value under `name`, keeping whatever is already stored.
    pub fn append(&mut self, name: &str, value: String) {
        let existing = self
            .0
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .cloned();
        match existing.and_then(|key| self.0.get_mut(&key)) {
            Some(current) => current.push(value),
            None => {
                self.0.insert(name.to_string(), OneOrMany::One(value));
            }
        }
    }

    /// Removes every case variant of `name`, returning their values merged in key order.
    pub fn remove(&mut self, name: &str) -> Option<OneOrMany> {
        let keys: Vec<String> = self
            .0
            .keys()
            .filter(|key| key.eq_ignore_ascii_case(name))
            .cloned()
            .collect();

        let values: Vec<String> = keys
            .iter()
            .filter_map(|key| self.0.remove(key))
            .flat_map(|value| value.values().to_vec())
            .collect();
        OneOrMany::from_values(values)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, OneOrMany> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<OneOrMany>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl IntoIterator for HeaderMap {
    type Item = (String, OneOrMany);
    type IntoIter = btree_map::IntoIter<String, OneOrMany>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = (&'a String, &'a OneOrMany);
    type IntoIter = btree_map::Iter<'a, String, OneOrMany>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
