//! Convenience builder for HTTP query parameters.
//!
//! Pairs are kept in insertion order. Array values are expressed as the same key
//! repeated once per element (`embed=a&embed=b`), which is what Marathon expects
//! for parameters such as `embed`.

use crate::{Error, Result};
use serde_json::Value;
use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a scalar key/value pair.
    pub fn push<T>(&mut self, key: impl Into<String>, value: T)
    where
        T: Display,
    {
        self.pairs.push((key.into(), value.to_string()));
    }

    /// Append the key once for every value.
    pub fn push_all<I, T>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let key = key.into();
        for value in values {
            self.pairs.push((key.clone(), value.to_string()));
        }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: impl Into<String>, value: Option<T>)
    where
        T: Display,
    {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Chaining form of [`QueryParams::push`].
    #[must_use]
    pub fn with<T>(mut self, key: impl Into<String>, value: T) -> Self
    where
        T: Display,
    {
        self.push(key, value);
        self
    }

    /// Chaining form of [`QueryParams::push_all`].
    #[must_use]
    pub fn with_all<I, T>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.push_all(key, values);
        self
    }

    /// Build parameters from a JSON object.
    ///
    /// Strings are used verbatim, numbers and booleans by their JSON text, arrays
    /// repeat the key and `null` values are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidQuery`] when `value` is not an object or holds a
    /// nested object.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::InvalidQuery(format!(
                "expected a JSON object, got `{value}`"
            )));
        };

        let mut params = Self::new();
        for (key, value) in map {
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(text) = scalar_text(key, item)? {
                            params.push(key.as_str(), text);
                        }
                    }
                }
                other => {
                    if let Some(text) = scalar_text(key, other)? {
                        params.push(key.as_str(), text);
                    }
                }
            }
        }
        Ok(params)
    }

    /// Borrow the collected key/value pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn scalar_text(key: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        Value::Bool(_) | Value::Number(_) => Ok(Some(value.to_string())),
        Value::Array(_) | Value::Object(_) => Err(Error::InvalidQuery(format!(
            "value for `{key}` must be a scalar or an array of scalars"
        ))),
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.push(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;
    use crate::Error;
    use serde_json::json;

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("force", Option::<bool>::None);
        assert!(params.is_empty());

        params.push_opt("force", Some(true));
        assert_eq!(params.pairs(), &[("force".to_string(), "true".to_string())]);
    }

    #[test]
    fn push_all_repeats_key() {
        let params = QueryParams::new()
            .with("id", "test-id")
            .with_all("embed", ["app.deployments", "app.lastTaskFailure"]);

        assert_eq!(
            params.into_pairs(),
            vec![
                ("id".to_string(), "test-id".to_string()),
                ("embed".to_string(), "app.deployments".to_string()),
                ("embed".to_string(), "app.lastTaskFailure".to_string()),
            ]
        );
    }

    #[test]
    fn from_json_flattens_arrays_and_skips_null() {
        let params = QueryParams::from_json(&json!({
            "embed": ["apps.tasks", "apps.counts"],
            "label": null,
            "limit": 5,
            "force": true
        }))
        .unwrap();

        let pairs = params.into_pairs();
        assert_eq!(pairs.len(), 4);
        assert!(pairs.iter().any(|(k, v)| k == "embed" && v == "apps.tasks"));
        assert!(pairs.iter().any(|(k, v)| k == "embed" && v == "apps.counts"));
        assert!(pairs.iter().any(|(k, v)| k == "limit" && v == "5"));
        assert!(pairs.iter().any(|(k, v)| k == "force" && v == "true"));
        assert!(!pairs.iter().any(|(k, _)| k == "label"));
    }

    #[test]
    fn from_json_rejects_nested_objects() {
        let err = QueryParams::from_json(&json!({"filter": {"a": 1}})).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));

        let err = QueryParams::from_json(&json!(["id"])).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[test]
    fn collects_from_iterator() {
        let params: QueryParams = [("cmd", "sleep"), ("id", "/web")].into_iter().collect();
        assert_eq!(params.pairs().len(), 2);
        assert_eq!(params.pairs()[1].1, "/web");
    }
}
