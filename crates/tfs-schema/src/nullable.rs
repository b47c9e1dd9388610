//! # Nullability Wrapping
//!
//! A nullable variable accepts either `null` or a value of its declared type:
//!
//! ```json
//! {"title": "<name>: Select a type",
//!  "type": "<inner type>",
//!  "anyOf": [{"type": "null", "title": "null"},
//!            {"type": "<inner type>", "title": "<inner type>", ...}]}
//! ```
//!
//! The outer `type` is scaffolding. It lets the condition matcher treat a
//! wrapped node like any other typed node; the assembler removes it once the
//! validation keywords are merged.

use serde_json::{json, Value};
use tfs_core::{SchemaNode, SchemaOptions, TypeConstraint, TypeError};

use crate::types;

/// Translate `constraint` and wrap the result to also accept `null`.
///
/// # Errors
///
/// Propagates any `TypeError` from translating `constraint`.
pub fn wrap(
    name: &str,
    constraint: &TypeConstraint,
    options: &SchemaOptions,
) -> Result<SchemaNode, TypeError> {
    let inner = types::translate(name, constraint, false, options)?;
    Ok(wrap_node(name, inner))
}

/// Wrap an already translated node to also accept `null`.
///
/// Idempotent: a node that already accepts `null` is returned unchanged.
pub fn wrap_node(name: &str, inner: SchemaNode) -> SchemaNode {
    if accepts_null(&inner) {
        return inner;
    }

    let scaffold = inner.type_name().map(str::to_owned);
    let inner = match &scaffold {
        Some(type_name) => inner.with("title", type_name.as_str()),
        None => inner,
    };

    let node = SchemaNode::new()
        .with("title", format!("{name}: Select a type"))
        .with(
            "anyOf",
            vec![json!({"type": "null", "title": "null"}), inner.into_value()],
        );
    match scaffold {
        Some(type_name) => node.with("type", type_name),
        None => node,
    }
}

/// Drop the scaffolding `type` that [`wrap_node`] copies onto the outer node.
///
/// Leaves nodes that are not nullable wrappers untouched.
pub fn strip_scaffolding(node: SchemaNode) -> SchemaNode {
    if is_wrapped(&node) {
        node.without("type")
    } else {
        node
    }
}

/// True if `node` is a nullable wrapper produced by [`wrap_node`].
pub fn is_wrapped(node: &SchemaNode) -> bool {
    node.get("anyOf")
        .and_then(Value::as_array)
        .is_some_and(|branches| branches.iter().any(is_null_branch))
}

/// True if `node` already admits `null`: it is a wrapper, it declares the
/// `null` type, or it carries no assertion at all.
fn accepts_null(node: &SchemaNode) -> bool {
    is_wrapped(node)
        || node.type_name() == Some("null")
        || node
            .keywords()
            .all(|k| matches!(k, "title" | "description" | "default"))
}

fn is_null_branch(branch: &Value) -> bool {
    branch.get("type").and_then(Value::as_str) == Some("null")
}
