//! Fragment merging.
//!
//! Merging is pure: inputs are borrowed, never modified, and a fresh fragment
//! comes back, so one base can be merged with several overlays.

use serde_json::{Map, Value};

use crate::config::fragment::{ConfigFragment, MergedConfig};

/// Merges configuration fragments.
///
/// # Merging Rules
///
/// - Key present on one side only: kept as-is
/// - Both values mappings: merged recursively with these same rules
/// - Both values sequences: overlay items appended after base items
/// - Anything else: overlay value wins, including when the two sides have
///   different kinds (a scalar replaces a mapping, a mapping replaces a
///   sequence, `null` replaces whatever was there)
///
/// # Examples
///
/// ```
/// use devconf::config::{ConfigFragment, ConfigMerger};
/// use serde_json::json;
///
/// let base = ConfigFragment::try_from(json!({"rules": ["js"], "port": 8080})).unwrap();
/// let overlay = ConfigFragment::try_from(json!({"rules": ["css"], "port": 8081})).unwrap();
///
/// let merged = ConfigMerger::merge(&base, &overlay);
/// assert_eq!(merged.get("rules"), Some(&json!(["js", "css"])));
/// assert_eq!(merged.get("port"), Some(&json!(8081)));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge `overlay` on top of `base`.
    #[must_use]
    pub fn merge(base: &ConfigFragment, overlay: &ConfigFragment) -> MergedConfig {
        MergedConfig::new(ConfigFragment::from(Self::merge_maps(
            base.as_map(),
            overlay.as_map(),
        )))
    }

    /// Merge several fragments, lowest precedence first.
    #[must_use]
    pub fn merge_all<'a, I>(fragments: I) -> MergedConfig
    where
        I: IntoIterator<Item = &'a ConfigFragment>,
    {
        let merged = fragments
            .into_iter()
            .fold(Map::new(), |acc, next| Self::merge_maps(&acc, next.as_map()));
        MergedConfig::new(ConfigFragment::from(merged))
    }

    fn merge_maps(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
        let mut result = base.clone();

        for (key, overlay_value) in overlay {
            let merged = match result.get(key) {
                Some(base_value) => Self::merge_values(base_value, overlay_value),
                None => overlay_value.clone(),
            };
            result.insert(key.clone(), merged);
        }

        result
    }

    fn merge_values(base: &Value, overlay: &Value) -> Value {
        match (base, overlay) {
            (Value::Object(b), Value::Object(o)) => Value::Object(Self::merge_maps(b, o)),
            (Value::Array(b), Value::Array(o)) => {
                Value::Array(b.iter().chain(o.iter()).cloned().collect())
            }
            // Scalars and mismatched kinds: overlay wins.
            (_, o) => o.clone(),
        }
    }
}
