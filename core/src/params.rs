//! Address parameters: the query part of a shareable list-view link.
//!
//! Keys are kept sorted so two addresses describing the same view serialize
//! byte-identically, whatever order the controls were touched in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use thiserror::Error;

/// One parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Key present once.
    One(String),
    /// Key repeated, in address order.
    Many(Vec<String>),
}

impl ParamValue {
    /// Values as a slice, whatever the arity.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }

    /// The value when it is single.
    #[must_use]
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::One(value) => Some(value),
            Self::Many(_) => None,
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

/// Failure to decode a raw query string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed query string: {0}")]
pub struct QueryDecodeError(pub String);

/// Ordered mapping from parameter name to value(s).
///
/// Absence of a key means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressParameters {
    entries: BTreeMap<String, ParamValue>,
}

impl AddressParameters {
    /// Empty address.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Decode an `application/x-www-form-urlencoded` query (without `?`).
    ///
    /// A key seen once decodes to [`ParamValue::One`], a repeated key to
    /// [`ParamValue::Many`].
    ///
    /// # Errors
    ///
    /// Returns [`QueryDecodeError`] when a `%` is not followed by two hex
    /// digits or an escape decodes to invalid UTF-8. Nothing is repaired.
    pub fn from_query(query: &str) -> Result<Self, QueryDecodeError> {
        let mut params = Self::new();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let (key, value) = (decode_component(key)?, decode_component(value)?);
            match params.entries.entry(key) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(ParamValue::One(value));
                }
                btree_map::Entry::Occupied(mut slot) => {
                    let merged = match slot.get_mut() {
                        ParamValue::One(first) => ParamValue::Many(vec![std::mem::take(first), value]),
                        ParamValue::Many(values) => {
                            values.push(value);
                            continue;
                        }
                    };
                    slot.insert(merged);
                }
            }
        }
        Ok(params)
    }

    /// Encode as a query string (without `?`), keys sorted, repeated keys for
    /// multi-valued parameters.
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut pairs = Vec::new();
        for (key, value) in &self.entries {
            for item in value.as_slice() {
                pairs.push(format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(item)
                ));
            }
        }
        pairs.join("&")
    }

    /// Value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Whether a key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set a key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Remove a key.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.remove(key)
    }

    /// Iterate keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply a patch: set or remove the keys it names, keep everything else.
    pub fn apply(&mut self, patch: AddressPatch) {
        for (key, change) in patch.changes {
            match change {
                Some(value) => {
                    self.entries.insert(key, value);
                }
                None => {
                    self.entries.remove(&key);
                }
            }
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for AddressParameters {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

fn decode_component(raw: &str) -> Result<String, QueryDecodeError> {
    let bytes = raw.as_bytes();
    for (at, _) in raw.match_indices('%') {
        let escape = bytes.get(at + 1..at + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err(QueryDecodeError(format!("invalid percent escape in {raw:?}")));
        }
    }
    urlencoding::decode(&raw.replace('+', " "))
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| QueryDecodeError(format!("{raw:?} is not valid UTF-8 once decoded")))
}

/// Partial write to an address. Keys not mentioned are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressPatch {
    changes: BTreeMap<String, Option<ParamValue>>,
}

impl AddressPatch {
    /// Empty patch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            changes: BTreeMap::new(),
        }
    }

    /// Set a key.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.changes.insert(key.into(), Some(value.into()));
        self
    }

    /// Remove a key.
    #[must_use]
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.changes.insert(key.into(), None);
        self
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Keys touched by this patch.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }
}
