//! # Translated Variables
//!
//! One declared variable block, already decoded by the external reader.
//! Consumed read-only by the schema engine.
//!
//! A malformed `type` does not fail decoding of the whole file. It is kept
//! as [`DeclaredType::Malformed`] so the assembler's `on_type_error` policy
//! decides whether the variable aborts generation or is skipped.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::condition::ConditionExpr;
use crate::constraint::TypeConstraint;
use crate::error::TypeError;

/// A variable's `type` attribute as declared.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    Valid(TypeConstraint),
    /// The wire value did not decode; `raw` is kept for re-encoding.
    Malformed { raw: Value, error: TypeError },
}

impl DeclaredType {
    /// Decode the wire form, keeping the error instead of returning it.
    pub fn from_json(raw: &Value) -> Self {
        match TypeConstraint::from_json(raw) {
            Ok(constraint) => Self::Valid(constraint),
            Err(error) => Self::Malformed {
                raw: raw.clone(),
                error,
            },
        }
    }

    /// The decoded constraint.
    ///
    /// # Errors
    ///
    /// Returns the decoding error of a malformed type.
    pub fn constraint(&self) -> Result<&TypeConstraint, TypeError> {
        match self {
            Self::Valid(constraint) => Ok(constraint),
            Self::Malformed { error, .. } => Err(error.clone()),
        }
    }

    pub fn as_constraint(&self) -> Option<&TypeConstraint> {
        self.constraint().ok()
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Valid(constraint) => constraint.to_json(),
            Self::Malformed { raw, .. } => raw.clone(),
        }
    }
}

impl Default for DeclaredType {
    fn default() -> Self {
        Self::Valid(TypeConstraint::any())
    }
}

impl From<TypeConstraint> for DeclaredType {
    fn from(constraint: TypeConstraint) -> Self {
        Self::Valid(constraint)
    }
}

impl PartialEq<TypeConstraint> for DeclaredType {
    fn eq(&self, other: &TypeConstraint) -> bool {
        self.as_constraint() == Some(other)
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(constraint) => write!(f, "{constraint}"),
            Self::Malformed { raw, .. } => write!(f, "<malformed {raw}>"),
        }
    }
}

impl Serialize for DeclaredType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DeclaredType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|raw| Self::from_json(&raw))
    }
}

/// A decoded variable block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedVariable {
    pub name: String,

    /// Declared type; `any` when the block has no `type` attribute.
    #[serde(rename = "type", default)]
    pub type_constraint: DeclaredType,

    /// Declared nullability. `None` defers to `SchemaOptions::nullable_default`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    /// Folded default value. `Some(Value::Null)` is an explicit `default = null`,
    /// which still makes the variable optional.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// One condition per `validation` block, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ConditionExpr>,
}

impl TranslatedVariable {
    pub fn new(name: impl Into<String>, type_constraint: impl Into<DeclaredType>) -> Self {
        Self {
            name: name.into(),
            type_constraint: type_constraint.into(),
            nullable: None,
            default: None,
            description: None,
            conditions: Vec::new(),
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_condition(mut self, condition: ConditionExpr) -> Self {
        self.conditions.push(condition);
        self
    }

    /// True iff the variable has no default.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Effective nullability given the configured default.
    pub fn is_nullable(&self, nullable_default: bool) -> bool {
        self.nullable.unwrap_or(nullable_default)
    }
}

/// The document the CLI reads: every variable of one module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableFile {
    #[serde(default)]
    pub variables: Vec<TranslatedVariable>,
}

/// Deserialize a present key as `Some`, including an explicit `null`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}
