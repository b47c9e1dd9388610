//! # Type Translation
//!
//! Recursive conversion of a [`TypeConstraint`] into a JSON Schema node.
//!
//! | constraint | node |
//! |---|---|
//! | `string` / `number` / `bool` | `{type: string / number / boolean}` |
//! | `any` at the top of a variable | `{}` |
//! | `any` nested in a container | `{anyOf: [object, array, string, number, boolean, null]}` |
//! | `object` | `{type: object, additionalProperties, properties, required}` |
//! | `map(T)` | `{type: object, additionalProperties: T}` |
//! | `list(T)` | `{type: array, items: T}` |
//! | `set(T)` | `{type: array, uniqueItems: true, items: T}` |
//! | `tuple([T...])` | `{type: array, items: [T...], minItems: n, maxItems: n}` |
//!
//! `required` on objects is always sorted, so output is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tfs_core::constraint::check_optional_subset;
use tfs_core::{PrimitiveKind, SchemaNode, SchemaOptions, TypeConstraint, TypeError};

use crate::nullable;

/// Branch types offered for a nested `any`, in the order they are listed.
const GENERIC_BRANCH_TYPES: [&str; 6] = ["object", "array", "string", "number", "boolean", "null"];

/// Where a constraint sits. `any` translates differently at the top of a
/// variable than inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Top,
    Nested,
}

/// Translate a variable's type constraint into a schema node.
///
/// With `nullable` set, delegates to [`nullable::wrap`]; `name` is used only
/// for the wrapper's title.
///
/// # Errors
///
/// Returns `TypeError::Structural` if an object constraint lists an
/// optional attribute it does not declare.
pub fn translate(
    name: &str,
    constraint: &TypeConstraint,
    nullable: bool,
    options: &SchemaOptions,
) -> Result<SchemaNode, TypeError> {
    if nullable {
        return nullable::wrap(name, constraint, options);
    }
    node_for(constraint, Position::Top, options)
}

/// The schema accepting every value a nested `any` admits, one titled
/// branch per JSON type.
pub fn generic_any() -> SchemaNode {
    let branches: Vec<Value> = GENERIC_BRANCH_TYPES
        .iter()
        .map(|t| SchemaNode::typed(t).with("title", *t).into_value())
        .collect();
    SchemaNode::new().with("anyOf", branches)
}

fn node_for(
    constraint: &TypeConstraint,
    position: Position,
    options: &SchemaOptions,
) -> Result<SchemaNode, TypeError> {
    match constraint {
        TypeConstraint::Primitive(kind) => Ok(primitive_node(*kind, position)),
        TypeConstraint::Object { fields, optional } => object_node(fields, optional, options),
        TypeConstraint::Map(element) => {
            let element = nested(element, options).map_err(|e| e.within("map"))?;
            Ok(SchemaNode::typed("object").with("additionalProperties", element))
        }
        TypeConstraint::List(element) => {
            let element = nested(element, options).map_err(|e| e.within("list"))?;
            Ok(SchemaNode::typed("array").with("items", element))
        }
        TypeConstraint::Set(element) => {
            let element = nested(element, options).map_err(|e| e.within("set"))?;
            Ok(SchemaNode::typed("array")
                .with("uniqueItems", true)
                .with("items", element))
        }
        TypeConstraint::Tuple(elements) => {
            let items = elements
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    nested(e, options)
                        .map(SchemaNode::into_value)
                        .map_err(|err| err.within(format!("tuple[{i}]")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let len = items.len();
            Ok(SchemaNode::typed("array")
                .with("items", items)
                .with("minItems", len)
                .with("maxItems", len))
        }
    }
}

fn nested(constraint: &TypeConstraint, options: &SchemaOptions) -> Result<SchemaNode, TypeError> {
    node_for(constraint, Position::Nested, options)
}

fn primitive_node(kind: PrimitiveKind, position: Position) -> SchemaNode {
    match (kind.json_type(), position) {
        (Some(json_type), _) => SchemaNode::typed(json_type),
        (None, Position::Top) => SchemaNode::new(),
        (None, Position::Nested) => generic_any(),
    }
}

fn object_node(
    fields: &BTreeMap<String, TypeConstraint>,
    optional: &BTreeSet<String>,
    options: &SchemaOptions,
) -> Result<SchemaNode, TypeError> {
    check_optional_subset(fields, optional).map_err(|e| e.within("object"))?;

    let mut properties = serde_json::Map::new();
    for (key, field) in fields {
        let node = nested(field, options).map_err(|e| e.within(format!("object.{key}")))?;
        properties.insert(key.clone(), node.into_value());
    }

    // BTreeMap keys iterate in sorted order.
    let required: Vec<&str> = fields
        .keys()
        .filter(|key| options.require_all || !optional.contains(*key))
        .map(String::as_str)
        .collect();

    Ok(SchemaNode::typed("object")
        .with("additionalProperties", options.allow_additional_properties)
        .with("properties", properties)
        .with("required", required))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn constraint() -> impl Strategy<Value = TypeConstraint> {
        let leaf = prop_oneof![
            Just(TypeConstraint::string()),
            Just(TypeConstraint::number()),
            Just(TypeConstraint::bool()),
            Just(TypeConstraint::any()),
        ];
        leaf.prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                inner.clone().prop_map(TypeConstraint::list),
                inner.clone().prop_map(TypeConstraint::set),
                inner.clone().prop_map(TypeConstraint::map),
                prop::collection::vec(inner.clone(), 0..5).prop_map(TypeConstraint::tuple),
                (
                    prop::collection::btree_map("[a-z]{1,6}", inner, 0..6),
                    prop::collection::vec(any::<bool>(), 6),
                )
                    .prop_map(|(fields, flags)| {
                        let optional = fields
                            .keys()
                            .zip(flags)
                            .filter(|(_, flag)| *flag)
                            .map(|(k, _)| k.clone())
                            .collect();
                        TypeConstraint::Object { fields, optional }
                    }),
            ]
        })
    }

    proptest! {
        /// Well-formed trees always translate.
        #[test]
        fn translation_is_total(t in constraint(), require_all in any::<bool>()) {
            let opts = SchemaOptions { require_all, ..SchemaOptions::default() };
            prop_assert!(translate("v", &t, false, &opts).is_ok());
        }

        /// Tuples always pin both item counts to their arity.
        #[test]
        fn tuple_counts_match_arity(elements in prop::collection::vec(constraint(), 0..6)) {
            let n = elements.len();
            let node = translate("v", &TypeConstraint::tuple(elements), false, &SchemaOptions::default()).unwrap();
            prop_assert_eq!(node.get("minItems"), Some(&serde_json::json!(n)));
            prop_assert_eq!(node.get("maxItems"), Some(&serde_json::json!(n)));
        }

        /// Sets always require unique items.
        #[test]
        fn set_requires_unique_items(element in constraint()) {
            let node = translate("v", &TypeConstraint::set(element), false, &SchemaOptions::default()).unwrap();
            prop_assert_eq!(node.get("uniqueItems"), Some(&Value::Bool(true)));
        }

        /// Object `required` is the sorted non-optional attributes, or all of
        /// them under `require_all`.
        #[test]
        fn object_required_is_sorted_difference(
            names in prop::collection::btree_set("[a-z]{1,6}", 0..8),
            flags in prop::collection::vec(any::<bool>(), 8),
            require_all in any::<bool>(),
        ) {
            let optional: BTreeSet<String> = names
                .iter()
                .zip(flags)
                .filter(|(_, flag)| *flag)
                .map(|(n, _)| n.clone())
                .collect();
            let fields: BTreeMap<String, TypeConstraint> =
                names.iter().map(|n| (n.clone(), TypeConstraint::string())).collect();
            let opts = SchemaOptions { require_all, ..SchemaOptions::default() };
            let node = translate("v", &TypeConstraint::Object { fields, optional: optional.clone() }, false, &opts).unwrap();

            let mut expected: Vec<String> = names
                .iter()
                .filter(|n| require_all || !optional.contains(*n))
                .cloned()
                .collect();
            expected.sort();
            prop_assert_eq!(node.get("required"), Some(&serde_json::json!(expected)));
        }
    }
}
