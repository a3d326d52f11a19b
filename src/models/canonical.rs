//! Shape-agnostic request/response exchanged with the application runtime.

use std::slice;

use super::headers::{HeaderMap, OneOrMany};

/// Normalized query parameters.
///
/// Keys are case-sensitive and iterate in the order they first arrived; repeated values under a
/// key keep arrival order too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap(Vec<(String, OneOrMany)>);

impl QueryMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OneOrMany> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, values)| values)
    }

    /// Stores `values` under `key`. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, values: impl Into<OneOrMany>) -> Option<OneOrMany> {
        let key = key.into();
        let values = values.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, current)) => Some(std::mem::replace(current, values)),
            None => {
                self.0.push((key, values));
                None
            }
        }
    }

    /// Adds one more value under `key`, keeping whatever is already stored.
    pub fn append(&mut self, key: impl Into<String>, value: String) {
        let key = key.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, current)) => current.push(value),
            None => self.0.push((key, OneOrMany::One(value))),
        }
    }

    pub fn iter(&self) -> slice::Iter<'_, (String, OneOrMany)> {
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

impl<'a> IntoIterator for &'a QueryMap {
    type Item = &'a (String, OneOrMany);
    type IntoIter = slice::Iter<'a, (String, OneOrMany)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<OneOrMany>> FromIterator<(K, V)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (key, values) in iter {
            query.insert(key, values);
        }
        query
    }
}

/// Request handed to the dispatcher after inbound normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// Method as resolved from the event; compare case-insensitively.
    pub method: String,
    pub path: String,
    /// Path with the serialized query string appended.
    pub url: String,
    pub query: QueryMap,
    pub headers: HeaderMap,
    /// Decoded body text, empty when the event had none.
    pub body: String,
}

/// How the response body travels back to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Text,
    Binary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Text(String),
    Binary(Vec<u8>),
}

impl Default for ResponseBody {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<String> for ResponseBody {
    fn from(body: String) -> Self {
        Self::Text(body)
    }
}

impl From<&str> for ResponseBody {
    fn from(body: &str) -> Self {
        Self::Text(body.to_string())
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(body: Vec<u8>) -> Self {
        Self::Binary(body)
    }
}

/// Response produced by the dispatcher.
///
/// `kind` is set when the runtime already knows how the body must be transported; when it is
/// `None` the outbound normalizer decides from the body type and headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: ResponseBody,
    pub kind: Option<BodyKind>,
}

impl CanonicalResponse {
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::default(),
            kind: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<OneOrMany>) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<ResponseBody>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: BodyKind) -> Self {
        self.kind = Some(kind);
        self
    }
}
