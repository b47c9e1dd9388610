//! `a <= var.x && length(var.x) < b` → bound keywords.
//!
//! | type | `>` | `>=` | `<` | `<=` | `==` |
//! |---|---|---|---|---|---|
//! | number | exclusiveMinimum | minimum | exclusiveMaximum | maximum | (rejected) |
//! | array | minItems + 1 | minItems | maxItems - 1 | maxItems | both |
//! | object | minProperties + 1 | minProperties | maxProperties - 1 | maxProperties | both |
//! | string | minLength + 1 | minLength | maxLength - 1 | maxLength | both |
//!
//! Count keywords are inclusive in JSON Schema, so strict comparisons shift
//! the bound by one instead of using an exclusive keyword.

use tfs_core::{json_number, CompareOp, ConditionExpr, SchemaNode};

/// Which side of a range a keyword constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

/// The side a bound keyword constrains, or `None` for non-bound keywords.
pub fn bound_kind(keyword: &str) -> Option<Bound> {
    match keyword {
        "minimum" | "exclusiveMinimum" | "minItems" | "minProperties" | "minLength" => {
            Some(Bound::Lower)
        }
        "maximum" | "exclusiveMaximum" | "maxItems" | "maxProperties" | "maxLength" => {
            Some(Bound::Upper)
        }
        _ => None,
    }
}

/// True if `candidate` narrows the range more than `current`.
pub fn tighter(bound: Bound, current: f64, candidate: f64) -> bool {
    match bound {
        Bound::Lower => candidate > current,
        Bound::Upper => candidate < current,
    }
}

/// How the compared value relates to the variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subject {
    Value,
    Length,
}

pub(super) fn recognize(
    condition: &ConditionExpr,
    name: &str,
    type_name: Option<&str>,
) -> Result<SchemaNode, String> {
    let type_name = type_name.ok_or("node has no concrete type")?;
    if !matches!(type_name, "number" | "array" | "object" | "string") {
        return Err(format!("type {type_name} does not support range constraints"));
    }

    let mut delta = SchemaNode::new();
    collect(condition, name, type_name, &mut delta)?;
    Ok(delta)
}

fn collect(
    expr: &ConditionExpr,
    name: &str,
    type_name: &str,
    delta: &mut SchemaNode,
) -> Result<(), String> {
    match expr {
        ConditionExpr::And { lhs, rhs } => {
            collect(lhs, name, type_name, delta)?;
            collect(rhs, name, type_name, delta)
        }
        ConditionExpr::Paren { inner } => collect(inner, name, type_name, delta),
        ConditionExpr::Compare { op, lhs, rhs } => {
            for (keyword, value) in comparison(*op, lhs, rhs, name, type_name)? {
                let keep_existing = match (bound_kind(keyword), delta.number(keyword)) {
                    (Some(bound), Some(current)) => !tighter(bound, current, value),
                    _ => false,
                };
                if !keep_existing {
                    delta.insert(keyword, json_number(value));
                }
            }
            Ok(())
        }
        ConditionExpr::Or { .. } => Err("operator || is not &&".to_string()),
        _ => Err("could not evaluate expression".to_string()),
    }
}

/// Translate one comparison into `(keyword, value)` pairs.
fn comparison(
    op: CompareOp,
    lhs: &ConditionExpr,
    rhs: &ConditionExpr,
    name: &str,
    type_name: &str,
) -> Result<Vec<(&'static str, f64)>, String> {
    let refers = |e: &ConditionExpr| e.is_var(name) || e.is_length_of(name);
    let (op, subject, bound) = if refers(rhs) && !refers(lhs) {
        (op.mirrored(), rhs, lhs)
    } else {
        (op, lhs, rhs)
    };

    if op == CompareOp::Ne {
        return Err("operator != cannot be expressed as a range".to_string());
    }

    let subject = if subject.is_var(name) {
        Subject::Value
    } else if subject.is_length_of(name) {
        Subject::Length
    } else {
        return Err("variable name not found".to_string());
    };

    let value = bound
        .literal_value()
        .and_then(|v| v.as_f64())
        .ok_or_else(|| format!("value {bound} is not a numeric constant"))?;

    match (type_name, subject) {
        ("number", Subject::Value) => number_keywords(op, value),
        ("number", Subject::Length) => Err("length() is not defined for type number".to_string()),
        (_, Subject::Value) => Err(format!(
            "direct comparison is only supported for type number, not {type_name}"
        )),
        (_, Subject::Length) => count_keywords(op, value, type_name),
    }
}

fn number_keywords(op: CompareOp, value: f64) -> Result<Vec<(&'static str, f64)>, String> {
    match op {
        CompareOp::Gt => Ok(vec![("exclusiveMinimum", value)]),
        CompareOp::Ge => Ok(vec![("minimum", value)]),
        CompareOp::Lt => Ok(vec![("exclusiveMaximum", value)]),
        CompareOp::Le => Ok(vec![("maximum", value)]),
        CompareOp::Eq => Err("direct == on a number is left to the equality rule".to_string()),
        CompareOp::Ne => Err("operator != cannot be expressed as a range".to_string()),
    }
}

fn count_keywords(
    op: CompareOp,
    value: f64,
    type_name: &str,
) -> Result<Vec<(&'static str, f64)>, String> {
    let (min, max) = match type_name {
        "array" => ("minItems", "maxItems"),
        "object" => ("minProperties", "maxProperties"),
        _ => ("minLength", "maxLength"),
    };
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return Err(format!("length bound {value} is out of range"));
    }
    if value.fract() != 0.0 {
        return Err(format!("length bound {value} is not an integer"));
    }

    let pairs = match op {
        CompareOp::Gt => vec![(min, value + 1.0)],
        CompareOp::Ge => vec![(min, value)],
        CompareOp::Lt => vec![(max, value - 1.0)],
        CompareOp::Le => vec![(max, value)],
        CompareOp::Eq => vec![(min, value), (max, value)],
        CompareOp::Ne => return Err("operator != cannot be expressed as a range".to_string()),
    };
    if let Some((keyword, bound)) = pairs.iter().find(|(_, bound)| *bound < 0.0) {
        return Err(format!("{keyword} would be negative ({bound})"));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cmp(op: CompareOp, lhs: ConditionExpr, rhs: ConditionExpr) -> ConditionExpr {
        ConditionExpr::compare(op, lhs, rhs)
    }

    fn len_x() -> ConditionExpr {
        ConditionExpr::length(ConditionExpr::var("x"))
    }

    #[test]
    fn test_number_exclusive_bounds() {
        let cond = ConditionExpr::and(
            cmp(CompareOp::Gt, ConditionExpr::var("x"), ConditionExpr::lit(0)),
            cmp(CompareOp::Lt, ConditionExpr::var("x"), ConditionExpr::lit(1.5)),
        );
        let delta = recognize(&cond, "x", Some("number")).unwrap();
        assert_eq!(
            delta.into_value(),
            json!({"exclusiveMinimum": 0, "exclusiveMaximum": 1.5})
        );
    }

    #[test]
    fn test_swapped_operands_are_mirrored() {
        // 3 < length(var.x)  is  length(var.x) > 3
        let cond = cmp(CompareOp::Lt, ConditionExpr::lit(3), len_x());
        let delta = recognize(&cond, "x", Some("string")).unwrap();
        assert_eq!(delta.into_value(), json!({"minLength": 4}));
    }

    #[test]
    fn test_length_equality_pins_both_bounds() {
        let cond = cmp(CompareOp::Eq, len_x(), ConditionExpr::lit(2));
        let delta = recognize(&cond, "x", Some("object")).unwrap();
        assert_eq!(
            delta.into_value(),
            json!({"minProperties": 2, "maxProperties": 2})
        );
    }

    #[test]
    fn test_length_call_form_is_accepted() {
        let call = ConditionExpr::call("length", vec![ConditionExpr::var("x")]);
        let cond = cmp(CompareOp::Le, call, ConditionExpr::lit(5));
        let delta = recognize(&cond, "x", Some("array")).unwrap();
        assert_eq!(delta.into_value(), json!({"maxItems": 5}));
    }

    #[test]
    fn test_later_comparison_only_wins_when_tighter() {
        let cond = ConditionExpr::and(
            ConditionExpr::and(
                cmp(CompareOp::Ge, len_x(), ConditionExpr::lit(5)),
                cmp(CompareOp::Ge, len_x(), ConditionExpr::lit(2)),
            ),
            cmp(CompareOp::Le, len_x(), ConditionExpr::lit(9)),
        );
        let delta = recognize(&cond, "x", Some("string")).unwrap();
        assert_eq!(delta.into_value(), json!({"minLength": 5, "maxLength": 9}));
    }

    #[test]
    fn test_direct_equality_on_number_rejected() {
        let cond = cmp(CompareOp::Eq, ConditionExpr::var("x"), ConditionExpr::lit(3));
        assert!(recognize(&cond, "x", Some("number")).is_err());
    }

    #[test]
    fn test_direct_comparison_on_string_rejected() {
        let cond = cmp(CompareOp::Gt, ConditionExpr::var("x"), ConditionExpr::lit(3));
        let reason = recognize(&cond, "x", Some("string")).unwrap_err();
        assert!(reason.contains("only supported for type number"), "got: {reason}");
    }

    #[test]
    fn test_not_equal_rejected() {
        let cond = cmp(CompareOp::Ne, len_x(), ConditionExpr::lit(3));
        assert!(recognize(&cond, "x", Some("string")).is_err());
    }

    #[test]
    fn test_disjunction_rejected() {
        let cond = ConditionExpr::or(
            cmp(CompareOp::Gt, ConditionExpr::var("x"), ConditionExpr::lit(1)),
            cmp(CompareOp::Lt, ConditionExpr::var("x"), ConditionExpr::lit(0)),
        );
        assert_eq!(
            recognize(&cond, "x", Some("number")).unwrap_err(),
            "operator || is not &&"
        );
    }

    #[test]
    fn test_fractional_and_negative_counts_rejected() {
        let frac = cmp(CompareOp::Ge, len_x(), ConditionExpr::lit(1.5));
        assert!(recognize(&frac, "x", Some("array")).is_err());

        let negative = cmp(CompareOp::Lt, len_x(), ConditionExpr::lit(0));
        let reason = recognize(&negative, "x", Some("array")).unwrap_err();
        assert!(reason.contains("maxItems"), "got: {reason}");
    }

    #[test]
    fn test_huge_counts_rejected() {
        for bound in [1e300, -1e300, 9.3e18] {
            let cond = cmp(CompareOp::Ge, len_x(), ConditionExpr::lit(bound));
            let reason = recognize(&cond, "x", Some("string")).unwrap_err();
            assert!(reason.contains("out of range"), "got: {reason}");
        }

        let large = cmp(CompareOp::Le, len_x(), ConditionExpr::lit(4_000_000_000_u64));
        let delta = recognize(&large, "x", Some("string")).unwrap();
        assert_eq!(delta.into_value(), json!({"maxLength": 4_000_000_000_u64}));
    }

    #[test]
    fn test_unsupported_types_rejected() {
        let cond = cmp(CompareOp::Gt, ConditionExpr::var("x"), ConditionExpr::lit(1));
        assert!(recognize(&cond, "x", Some("boolean")).is_err());
        assert!(recognize(&cond, "x", None).is_err());
    }

    #[test]
    fn test_tighter() {
        assert!(tighter(Bound::Lower, 1.0, 2.0));
        assert!(!tighter(Bound::Lower, 2.0, 2.0));
        assert!(tighter(Bound::Upper, 5.0, 4.0));
        assert!(!tighter(Bound::Upper, 4.0, 5.0));
        assert_eq!(bound_kind("exclusiveMaximum"), Some(Bound::Upper));
        assert_eq!(bound_kind("pattern"), None);
    }
}
