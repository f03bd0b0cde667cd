//! Job data payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed payload passed into executions.
///
/// A definition and each trigger may carry one; the execution context sees
/// them merged, trigger entries overriding definition entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobDataMap(Map<String, Value>);

impl JobDataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of `self` overlaid with `other`; `other` wins on conflicts.
    pub fn merged(&self, other: &JobDataMap) -> JobDataMap {
        let mut merged = self.clone();
        for (key, value) in &other.0 {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }
}

impl From<Map<String, Value>> for JobDataMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for JobDataMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_getters() {
        let data = JobDataMap::new()
            .with("report", "daily")
            .with("retries", 3)
            .with("dry_run", true);

        assert_eq!(data.get_str("report"), Some("daily"));
        assert_eq!(data.get_i64("retries"), Some(3));
        assert_eq!(data.get_bool("dry_run"), Some(true));
        assert_eq!(data.get_str("retries"), None);
        assert!(data.get("missing").is_none());
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_merged_prefers_right_side() {
        let base = JobDataMap::new().with("a", 1).with("b", 1);
        let overlay = JobDataMap::new().with("b", 2).with("c", 2);

        let merged = base.merged(&overlay);
        assert_eq!(merged.get_i64("a"), Some(1));
        assert_eq!(merged.get_i64("b"), Some(2));
        assert_eq!(merged.get_i64("c"), Some(2));
        // Inputs are untouched.
        assert_eq!(base.get_i64("b"), Some(1));
    }

    #[test]
    fn test_from_iterator() {
        let data: JobDataMap = [("var1", json!(1)), ("var2", json!("two"))]
            .into_iter()
            .collect();
        assert_eq!(data.get_i64("var1"), Some(1));
        assert_eq!(data.get_str("var2"), Some("two"));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let data = JobDataMap::new().with("k", "v");
        assert_eq!(serde_json::to_value(&data).unwrap(), json!({"k": "v"}));
    }
}
