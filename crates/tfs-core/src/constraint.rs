//! # Type Constraints
//!
//! The structural description of a variable's accepted value shape.
//!
//! ## Wire Form
//!
//! The external reader hands type constraints over in the go-cty JSON type
//! encoding:
//!
//! | constraint | encoding |
//! |---|---|
//! | primitive | `"string"`, `"number"`, `"bool"`, `"any"` / `"dynamic"` |
//! | list / set / map | `["list", T]`, `["set", T]`, `["map", T]` |
//! | tuple | `["tuple", [T, ...]]` |
//! | object | `["object", {name: T}]` or `["object", {name: T}, ["opt", ...]]` |
//!
//! JSON `null` means no type was declared, which is `any`.
//! [`TypeConstraint::from_json`] is the only decoder; it returns
//! [`TypeError`] for malformed trees instead of aborting.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::TypeError;

/// A primitive type-constraint kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Number,
    Bool,
    Any,
}

impl PrimitiveKind {
    /// The keyword used for this kind in the wire form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::Any => "any",
        }
    }

    /// The JSON Schema `type` this kind maps to. `Any` has none.
    pub fn json_type(self) -> Option<&'static str> {
        match self {
            Self::String => Some("string"),
            Self::Number => Some("number"),
            Self::Bool => Some("boolean"),
            Self::Any => None,
        }
    }
}

/// A type-constraint tree.
///
/// # Invariants
///
/// - `Object::optional` is a subset of the keys of `Object::fields`. The
///   decoder and [`TypeConstraint::object`] enforce it; the translator
///   re-checks it because the variant fields are public.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeConstraint {
    Primitive(PrimitiveKind),
    Object {
        /// Attribute name to attribute type, iterated in sorted order.
        fields: BTreeMap<String, TypeConstraint>,
        /// Attributes that may be omitted.
        optional: BTreeSet<String>,
    },
    Map(Box<TypeConstraint>),
    List(Box<TypeConstraint>),
    Set(Box<TypeConstraint>),
    Tuple(Vec<TypeConstraint>),
}

impl Default for TypeConstraint {
    fn default() -> Self {
        Self::any()
    }
}

impl TypeConstraint {
    pub fn any() -> Self {
        Self::Primitive(PrimitiveKind::Any)
    }

    pub fn string() -> Self {
        Self::Primitive(PrimitiveKind::String)
    }

    pub fn number() -> Self {
        Self::Primitive(PrimitiveKind::Number)
    }

    pub fn bool() -> Self {
        Self::Primitive(PrimitiveKind::Bool)
    }

    pub fn list(element: TypeConstraint) -> Self {
        Self::List(Box::new(element))
    }

    pub fn set(element: TypeConstraint) -> Self {
        Self::Set(Box::new(element))
    }

    pub fn map(element: TypeConstraint) -> Self {
        Self::Map(Box::new(element))
    }

    pub fn tuple(elements: Vec<TypeConstraint>) -> Self {
        Self::Tuple(elements)
    }

    /// Build an object constraint, checking that every optional name is a
    /// declared attribute.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::Structural` naming the first undeclared optional
    /// attribute.
    pub fn object<K, O>(
        fields: impl IntoIterator<Item = (K, TypeConstraint)>,
        optional: impl IntoIterator<Item = O>,
    ) -> Result<Self, TypeError>
    where
        K: Into<String>,
        O: Into<String>,
    {
        let fields: BTreeMap<String, TypeConstraint> =
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let optional: BTreeSet<String> = optional.into_iter().map(Into::into).collect();
        check_optional_subset(&fields, &optional)?;
        Ok(Self::Object { fields, optional })
    }

    /// Short name of the constraint kind, as used in the wire form.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Primitive(kind) => kind.as_str(),
            Self::Object { .. } => "object",
            Self::Map(_) => "map",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Tuple(_) => "tuple",
        }
    }

    /// Returns true for the `any` primitive.
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Primitive(PrimitiveKind::Any))
    }

    /// Decode the go-cty JSON type encoding.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::UnknownConstraintKind` for a kind keyword this
    /// crate does not know, and `TypeError::Structural` for any other
    /// malformation. Both carry the path to the offending node.
    pub fn from_json(value: &Value) -> Result<Self, TypeError> {
        match value {
            Value::Null => Ok(Self::any()),
            Value::String(kind) => match kind.as_str() {
                "string" => Ok(Self::string()),
                "number" => Ok(Self::number()),
                "bool" => Ok(Self::bool()),
                "any" | "dynamic" => Ok(Self::any()),
                other => Err(TypeError::unknown_kind(other)),
            },
            Value::Array(parts) => decode_collection(parts),
            other => Err(TypeError::structural(format!(
                "type constraint must be a string or an array, found {other}"
            ))),
        }
    }

    /// Encode back into the go-cty JSON type encoding.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Primitive(kind) => Value::String(kind.as_str().to_string()),
            Self::Object { fields, optional } => {
                let attrs: serde_json::Map<String, Value> = fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect();
                if optional.is_empty() {
                    serde_json::json!(["object", attrs])
                } else {
                    serde_json::json!(["object", attrs, optional])
                }
            }
            Self::Map(element) => serde_json::json!(["map", element.to_json()]),
            Self::List(element) => serde_json::json!(["list", element.to_json()]),
            Self::Set(element) => serde_json::json!(["set", element.to_json()]),
            Self::Tuple(elements) => {
                let elements: Vec<Value> = elements.iter().map(TypeConstraint::to_json).collect();
                serde_json::json!(["tuple", elements])
            }
        }
    }
}

/// Check the `optional ⊆ fields` invariant of an object constraint.
pub fn check_optional_subset(
    fields: &BTreeMap<String, TypeConstraint>,
    optional: &BTreeSet<String>,
) -> Result<(), TypeError> {
    match optional.iter().find(|name| !fields.contains_key(*name)) {
        Some(name) => Err(TypeError::structural(format!(
            "optional attribute {name:?} is not declared by the object"
        ))),
        None => Ok(()),
    }
}

fn decode_collection(parts: &[Value]) -> Result<TypeConstraint, TypeError> {
    let kind = match parts.first() {
        Some(Value::String(kind)) => kind.as_str(),
        Some(other) => {
            return Err(TypeError::structural(format!(
                "collection kind must be a string, found {other}"
            )))
        }
        None => return Err(TypeError::structural("empty type constraint array")),
    };

    match kind {
        "list" | "set" | "map" => {
            if parts.len() != 2 {
                return Err(TypeError::structural(format!(
                    "{kind} type must have exactly one element type, found {} arguments",
                    parts.len() - 1
                )));
            }
            let element = TypeConstraint::from_json(&parts[1]).map_err(|e| e.within(kind))?;
            Ok(match kind {
                "list" => TypeConstraint::list(element),
                "set" => TypeConstraint::set(element),
                _ => TypeConstraint::map(element),
            })
        }
        "tuple" => {
            if parts.len() != 2 {
                return Err(TypeError::structural(format!(
                    "tuple type must have exactly one element list, found {} arguments",
                    parts.len() - 1
                )));
            }
            let Value::Array(elements) = &parts[1] else {
                return Err(TypeError::structural(format!(
                    "tuple elements must be an array, found {}",
                    parts[1]
                )));
            };
            let elements = elements
                .iter()
                .enumerate()
                .map(|(i, e)| TypeConstraint::from_json(e).map_err(|err| err.within(format!("tuple[{i}]"))))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeConstraint::tuple(elements))
        }
        "object" => decode_object(parts),
        other => Err(TypeError::unknown_kind(other)),
    }
}

fn decode_object(parts: &[Value]) -> Result<TypeConstraint, TypeError> {
    if parts.len() != 2 && parts.len() != 3 {
        return Err(TypeError::structural(format!(
            "object type must have one or two arguments, found {}",
            parts.len() - 1
        )));
    }

    let Value::Object(attrs) = &parts[1] else {
        return Err(TypeError::structural(format!(
            "object attributes must be a map, found {}",
            parts[1]
        )));
    };

    let mut fields = BTreeMap::new();
    for (name, attr) in attrs {
        let attr = TypeConstraint::from_json(attr).map_err(|e| e.within(format!("object.{name}")))?;
        fields.insert(name.clone(), attr);
    }

    let mut optional = BTreeSet::new();
    if let Some(names) = parts.get(2) {
        let Value::Array(names) = names else {
            return Err(TypeError::structural(format!(
                "object optional attributes must be a list of strings, found {names}"
            )));
        };
        for name in names {
            let Value::String(name) = name else {
                return Err(TypeError::structural(format!(
                    "object optional attributes must be a list of strings, found {name}"
                )));
            };
            optional.insert(name.clone());
        }
    }

    check_optional_subset(&fields, &optional)?;
    Ok(TypeConstraint::Object { fields, optional })
}

impl fmt::Display for TypeConstraint {
    /// Renders the constraint the way it is written in a variable block.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => f.write_str(kind.as_str()),
            Self::Object { fields, optional } => {
                f.write_str("object({")?;
                for (i, (name, attr)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if optional.contains(name) {
                        write!(f, "{name} = optional({attr})")?;
                    } else {
                        write!(f, "{name} = {attr}")?;
                    }
                }
                f.write_str("})")
            }
            Self::Map(element) => write!(f, "map({element})"),
            Self::List(element) => write!(f, "list({element})"),
            Self::Set(element) => write!(f, "set({element})"),
            Self::Tuple(elements) => {
                f.write_str("tuple([")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("])")
            }
        }
    }
}

impl Serialize for TypeConstraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TypeConstraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        TypeConstraint::from_json(&value).map_err(serde::de::Error::custom)
    }
}
