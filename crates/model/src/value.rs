//! Tagged value type for semi-structured telemetry
//!
//! Telemetry shapes vary between node firmware revisions, so the raw record
//! is kept as a small tree of [`Value`]s and read through explicit,
//! optional-returning accessors instead of fixed structs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping; iteration follows insertion (discovery) order.
pub type Map = IndexMap<String, Value>;

/// A semi-structured value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent / JSON `null`
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Any number (integers are widened)
    Number(f64),
    /// String
    String(String),
    /// Ordered sequence
    Seq(Vec<Value>),
    /// Ordered mapping
    Map(Map),
}

impl Value {
    /// Member `key` of a mapping; `None` for non-mappings and missing keys
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Follow a chain of mapping keys
    ///
    /// ```
    /// # use model::Value;
    /// let v = Value::from(serde_json::json!({"config": {"location": {"latitude": "52.1"}}}));
    /// assert_eq!(v.get_path(&["config", "location", "latitude"]).and_then(Value::as_f64), Some(52.1));
    /// ```
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |v, key| v.get(key))
    }

    /// Borrow as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value; numeric strings are accepted because the backend
    /// stringifies measurements.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Integer value, truncating towards zero
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_f64()
            .filter(|n| *n >= i64::MIN as f64 && *n <= i64::MAX as f64)
            .map(|n| n.trunc() as i64)
    }

    /// Borrow as a mapping
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow as a sequence
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(seq) => Some(seq),
            _ => None,
        }
    }

    /// Whether this is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short type name for log messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Seq(_) => "sequence",
            Value::Map(_) => "mapping",
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_strings_are_numbers() {
        assert_eq!(Value::from("87").as_f64(), Some(87.0));
        assert_eq!(Value::from(" 22.53 ").as_f64(), Some(22.53));
        assert_eq!(Value::from("ok").as_f64(), None);
        assert_eq!(Value::from("NaN").as_f64(), None);
    }

    #[test]
    fn accessors_reject_wrong_kinds() {
        let v = Value::from(json!({"a": [1, 2]}));
        assert!(v.get("a").unwrap().as_map().is_none());
        assert_eq!(v.get("a").unwrap().as_seq().unwrap().len(), 2);
        assert!(v.get("missing").is_none());
        assert!(Value::from("x").get("a").is_none());
    }

    #[test]
    fn conversion_preserves_key_order() {
        let v = Value::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<&str> = v.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn untagged_deserialize_matches_conversion() {
        let text = r#"{"n": null, "b": true, "x": 1.5, "s": "hi", "l": [1], "m": {"k": "v"}}"#;
        let direct: Value = serde_json::from_str(text).unwrap();
        let via_json = Value::from(serde_json::from_str::<serde_json::Value>(text).unwrap());
        assert_eq!(direct, via_json);
        assert!(direct.get("n").unwrap().is_null());
    }

    #[test]
    fn as_i64_truncates() {
        assert_eq!(Value::from(3600.9).as_i64(), Some(3600));
        assert_eq!(Value::from("-7200").as_i64(), Some(-7200));
    }
}
