//! Untyped configuration fragments.
//!
//! A fragment is a string-keyed mapping whose values are scalars, nested
//! mappings, or ordered sequences. It is the unit the merger works on and the
//! shape the build/serve engine ultimately consumes.

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A mapping from option name to value.
///
/// # Examples
///
/// ```
/// use devconf::config::ConfigFragment;
/// use serde_json::json;
///
/// let mut fragment = ConfigFragment::new();
/// fragment.set_path(&["devServer", "port"], json!(8080));
/// assert_eq!(fragment.get_path(&["devServer", "port"]), Some(&json!(8080)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigFragment(Map<String, Value>);

impl ConfigFragment {
    /// Creates an empty fragment.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Returns `true` if the fragment has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Looks up a top-level key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Follows `path` through nested mappings.
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.0.get(*first)?, |value, key| value.as_object()?.get(*key))
    }

    /// Sets a top-level key, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Sets the value at `path`, creating intermediate mappings.
    ///
    /// Any non-mapping value sitting on the path is replaced by a mapping.
    /// An empty path is a no-op.
    pub fn set_path(&mut self, path: &[&str], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut map = &mut self.0;
        for key in parents {
            let slot = map
                .entry((*key).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            // Just made sure it's an object.
            let Value::Object(inner) = slot else {
                unreachable!()
            };
            map = inner;
        }
        map.insert((*last).to_string(), value);
    }

    /// Appends `values` to the sequence at `key`.
    ///
    /// A missing key starts a new sequence; a non-sequence value is replaced.
    pub fn extend_list(&mut self, key: &str, values: impl IntoIterator<Item = Value>) {
        let slot = self
            .0
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        if let Value::Array(items) = slot {
            items.extend(values);
        }
    }

    /// Iterates over top-level entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrows the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the fragment into its underlying map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Consumes the fragment into a JSON object value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for ConfigFragment {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for ConfigFragment {
    type Error = Value;

    /// Accepts only JSON objects; anything else is handed back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

impl FromIterator<(String, Value)> for ConfigFragment {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The result of merging fragments.
///
/// Read-only for callers; only the publisher may finish it (port and plugin
/// list) before handing it out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MergedConfig(ConfigFragment);

impl MergedConfig {
    pub(crate) fn new(fragment: ConfigFragment) -> Self {
        Self(fragment)
    }

    pub(crate) fn fragment_mut(&mut self) -> &mut ConfigFragment {
        &mut self.0
    }

    /// Borrows the merged fragment.
    #[must_use]
    pub fn as_fragment(&self) -> &ConfigFragment {
        &self.0
    }

    /// Consumes into the merged fragment.
    #[must_use]
    pub fn into_fragment(self) -> ConfigFragment {
        self.0
    }
}

impl Deref for MergedConfig {
    type Target = ConfigFragment;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
