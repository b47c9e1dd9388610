//! # Schema Nodes
//!
//! `SchemaNode` is a JSON Schema object under construction: a mapping from
//! keyword names to JSON values. Builders take and return the node by value,
//! so the engine composes nodes and keyword deltas without shared mutation.
//!
//! Keys serialize in sorted order, which keeps output deterministic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `$schema` URI written at the root of every generated document.
pub const DRAFT_07_SCHEMA_URI: &str = "http://json-schema.org/draft-07/schema#";

/// A JSON Schema object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaNode(Map<String, Value>);

impl SchemaNode {
    /// The empty schema, which accepts any instance.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// `{"type": <type_name>}`.
    pub fn typed(type_name: &str) -> Self {
        Self::new().with("type", type_name)
    }

    /// Set `keyword` and return the node.
    pub fn with(mut self, keyword: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(keyword.into(), value.into());
        self
    }

    /// Remove `keyword` and return the node.
    pub fn without(mut self, keyword: &str) -> Self {
        self.0.remove(keyword);
        self
    }

    /// Set `keyword`, returning the previous value.
    pub fn insert(&mut self, keyword: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(keyword.into(), value.into())
    }

    pub fn get(&self, keyword: &str) -> Option<&Value> {
        self.0.get(keyword)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.0.contains_key(keyword)
    }

    /// The concrete `type` keyword, when it is a single type name.
    pub fn type_name(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// Numeric value of `keyword`, if present and a number.
    pub fn number(&self, keyword: &str) -> Option<f64> {
        self.0.get(keyword).and_then(Value::as_f64)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<SchemaNode> for Value {
    fn from(node: SchemaNode) -> Self {
        node.into_value()
    }
}

impl From<Map<String, Value>> for SchemaNode {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl IntoIterator for SchemaNode {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Value)> for SchemaNode {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Convert a bound to a JSON number, as an integer when it is whole.
///
/// Count keywords (`minItems`, `maxLength`, ...) must be integers in the
/// output, and comparison literals arrive as floats after folding.
pub fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}
