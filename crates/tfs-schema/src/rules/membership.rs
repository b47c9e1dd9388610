//! `contains(<literal list>, var.x)` → `{enum: [...]}`.

use serde_json::Value;
use tfs_core::{ConditionExpr, SchemaNode};

pub(super) fn recognize(condition: &ConditionExpr, name: &str) -> Result<SchemaNode, String> {
    let args = condition
        .call_args("contains", 2)
        .ok_or("condition is not a 'contains()' function")?;

    let options = match args[0].unparen() {
        ConditionExpr::List { items } => items
            .iter()
            .map(|item| {
                item.literal_value()
                    .ok_or_else(|| format!("value {item} in list is not a constant"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        ConditionExpr::Literal {
            value: Value::Array(items),
        } => items.clone(),
        _ => return Err("first argument is not a list".to_string()),
    };

    if !args[1].is_var(name) {
        return Err("second argument is not a direct reference to the input variable".to_string());
    }

    Ok(SchemaNode::new().with("enum", options))
}
