//! # Generation Options
//!
//! The configuration object threaded by reference through schema generation.
//! Deserializable so the CLI can load it from a YAML or JSON config file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the assembler does when a variable's type constraint is malformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeErrorPolicy {
    /// Abort schema generation with the error.
    #[default]
    Fail,
    /// Leave the variable out of the schema and report a diagnostic.
    Skip,
}

/// Options for schema generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaOptions {
    /// Value of `additionalProperties` at the root and on every object type.
    pub allow_additional_properties: bool,
    /// Mark every variable and every object attribute as required.
    pub require_all: bool,
    /// Nullability for variables that do not declare `nullable`.
    pub nullable_default: bool,
    /// Produce an empty root schema instead of failing when there are no
    /// variables.
    pub allow_empty: bool,
    /// Variables left out of the schema entirely.
    pub ignore_variables: Vec<String>,
    /// Extra root keywords such as `$id` or `title`.
    pub root_properties: BTreeMap<String, Value>,
    pub on_type_error: TypeErrorPolicy,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            allow_additional_properties: true,
            require_all: false,
            nullable_default: false,
            allow_empty: false,
            ignore_variables: Vec::new(),
            root_properties: BTreeMap::new(),
            on_type_error: TypeErrorPolicy::Fail,
        }
    }
}

impl SchemaOptions {
    /// True if `name` is listed in `ignore_variables`.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_variables.iter().any(|ignored| ignored == name)
    }
}
