//! `can(regex("<pattern>", var.x))` → `{pattern: "<pattern>"}`, strings only.

use regex::Regex;
use serde_json::Value;
use tfs_core::{ConditionExpr, SchemaNode};

pub(super) fn recognize(
    condition: &ConditionExpr,
    name: &str,
    type_name: Option<&str>,
) -> Result<SchemaNode, String> {
    if type_name != Some("string") {
        return Err(format!(
            "regex is only supported for type string, not {}",
            type_name.unwrap_or("untyped")
        ));
    }

    let inner = condition
        .call_args("can", 1)
        .ok_or("condition is not a 'can()' function")?;
    let args = inner[0]
        .call_args("regex", 2)
        .ok_or("argument of can() is not a 'regex()' function")?;

    if !args[1].is_var(name) {
        return Err("second argument of regex() is not the input variable".to_string());
    }
    let pattern = match args[0].literal_value() {
        Some(Value::String(pattern)) => pattern,
        _ => return Err(format!("pattern {} is not a constant string", args[0])),
    };
    if let Err(err) = Regex::new(&pattern) {
        let detail = err.to_string().lines().map(str::trim).collect::<Vec<_>>().join(" ");
        return Err(format!("invalid regex pattern: {detail}"));
    }

    Ok(SchemaNode::new().with("pattern", pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn can_regex(pattern: ConditionExpr, subject: ConditionExpr) -> ConditionExpr {
        ConditionExpr::call(
            "can",
            vec![ConditionExpr::call("regex", vec![pattern, subject])],
        )
    }

    #[test]
    fn test_pattern_extracted() {
        let cond = can_regex(ConditionExpr::lit("^ami-[0-9a-f]+$"), ConditionExpr::var("ami"));
        let delta = recognize(&cond, "ami", Some("string")).unwrap();
        assert_eq!(delta.into_value(), json!({"pattern": "^ami-[0-9a-f]+$"}));
    }

    #[test]
    fn test_requires_string_type() {
        let cond = can_regex(ConditionExpr::lit("^a"), ConditionExpr::var("x"));
        assert!(recognize(&cond, "x", Some("number")).is_err());
    }

    #[test]
    fn test_invalid_pattern_reason_is_single_line() {
        let cond = can_regex(ConditionExpr::lit("(unclosed"), ConditionExpr::var("x"));
        let reason = recognize(&cond, "x", Some("string")).unwrap_err();
        assert!(reason.starts_with("invalid regex pattern"));
        assert_eq!(reason.lines().count(), 1);
    }

    #[test]
    fn test_subject_must_be_the_variable() {
        let cond = can_regex(ConditionExpr::lit("^a"), ConditionExpr::var("y"));
        assert!(recognize(&cond, "x", Some("string")).is_err());
    }

    #[test]
    fn test_bare_regex_without_can_rejected() {
        let cond = ConditionExpr::call(
            "regex",
            vec![ConditionExpr::lit("^a"), ConditionExpr::var("x")],
        );
        assert_eq!(
            recognize(&cond, "x", Some("string")).unwrap_err(),
            "condition is not a 'can()' function"
        );
    }
}
