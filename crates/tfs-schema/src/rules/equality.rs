//! `var.x == a || var.x == b || ...` → `{enum: [a, b, ...]}`.
//!
//! Operands may appear in either order; options are collected left to right.

use serde_json::Value;
use tfs_core::{CompareOp, ConditionExpr, SchemaNode};

pub(super) fn recognize(condition: &ConditionExpr, name: &str) -> Result<SchemaNode, String> {
    let mut options = Vec::new();
    collect(condition, name, &mut options)?;
    if options.is_empty() {
        return Err("no options found".to_string());
    }
    Ok(SchemaNode::new().with("enum", options))
}

fn collect(expr: &ConditionExpr, name: &str, options: &mut Vec<Value>) -> Result<(), String> {
    match expr {
        ConditionExpr::Or { lhs, rhs } => {
            collect(lhs, name, options)?;
            collect(rhs, name, options)
        }
        ConditionExpr::Paren { inner } => collect(inner, name, options),
        ConditionExpr::Compare {
            op: CompareOp::Eq,
            lhs,
            rhs,
        } => {
            let (subject, value) = if rhs.is_var(name) { (rhs, lhs) } else { (lhs, rhs) };
            if !subject.is_var(name) {
                return Err("variable name not found".to_string());
            }
            let value = value
                .literal_value()
                .ok_or_else(|| format!("value {value} is not a constant"))?;
            options.push(value);
            Ok(())
        }
        ConditionExpr::Compare { op, .. } => Err(format!("operator {op} is not || or ==")),
        ConditionExpr::And { .. } => Err("operator && is not || or ==".to_string()),
        _ => Err("could not evaluate expression".to_string()),
    }
}
