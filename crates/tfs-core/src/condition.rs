//! # Validation Condition AST
//!
//! The boolean expression of a `validation` block, as decoded by the
//! external reader. Literal operands arrive already folded to JSON values.
//!
//! The wire form is internally tagged on `kind`:
//!
//! ```json
//! {"kind": "or",
//!  "lhs": {"kind": "compare", "op": "==",
//!          "lhs": {"kind": "var_ref", "name": "region"},
//!          "rhs": {"kind": "literal", "value": "eu"}},
//!  "rhs": {"kind": "compare", "op": "==",
//!          "lhs": {"kind": "var_ref", "name": "region"},
//!          "rhs": {"kind": "literal", "value": "us"}}}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operator of a `Compare` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

impl CompareOp {
    /// The operator that gives the same result with the operands swapped.
    pub fn mirrored(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
            Self::Eq => Self::Eq,
            Self::Ne => Self::Ne,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A validation condition expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionExpr {
    And {
        lhs: Box<ConditionExpr>,
        rhs: Box<ConditionExpr>,
    },
    Or {
        lhs: Box<ConditionExpr>,
        rhs: Box<ConditionExpr>,
    },
    Compare {
        op: CompareOp,
        lhs: Box<ConditionExpr>,
        rhs: Box<ConditionExpr>,
    },
    Call {
        name: String,
        #[serde(default)]
        args: Vec<ConditionExpr>,
    },
    /// `var.<name>`.
    VarRef { name: String },
    Length { target: Box<ConditionExpr> },
    Literal { value: Value },
    /// A tuple constructor `[a, b, ...]` whose items were not folded.
    List { items: Vec<ConditionExpr> },
    Paren { inner: Box<ConditionExpr> },
}

impl ConditionExpr {
    pub fn var(name: impl Into<String>) -> Self {
        Self::VarRef { name: name.into() }
    }

    pub fn lit(value: impl Into<Value>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    pub fn and(lhs: ConditionExpr, rhs: ConditionExpr) -> Self {
        Self::And {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn or(lhs: ConditionExpr, rhs: ConditionExpr) -> Self {
        Self::Or {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn compare(op: CompareOp, lhs: ConditionExpr, rhs: ConditionExpr) -> Self {
        Self::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<ConditionExpr>) -> Self {
        Self::Call {
            name: name.into(),
            args,
        }
    }

    pub fn length(target: ConditionExpr) -> Self {
        Self::Length {
            target: Box::new(target),
        }
    }

    pub fn list(items: Vec<ConditionExpr>) -> Self {
        Self::List { items }
    }

    pub fn paren(inner: ConditionExpr) -> Self {
        Self::Paren {
            inner: Box::new(inner),
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &ConditionExpr {
        let mut expr = self;
        while let Self::Paren { inner } = expr {
            expr = inner;
        }
        expr
    }

    /// True if this is a direct reference to `var.<name>`.
    pub fn is_var(&self, name: &str) -> bool {
        matches!(self.unparen(), Self::VarRef { name: n } if n == name)
    }

    /// True if this is `length(var.<name>)`, either as a `Length` node or as a
    /// one-argument call to `length`.
    pub fn is_length_of(&self, name: &str) -> bool {
        match self.unparen() {
            Self::Length { target } => target.is_var(name),
            expr => expr
                .call_args("length", 1)
                .is_some_and(|args| args[0].is_var(name)),
        }
    }

    /// The arguments of a call to `function` with exactly `arity` arguments.
    pub fn call_args(&self, function: &str, arity: usize) -> Option<&[ConditionExpr]> {
        match self.unparen() {
            Self::Call { name, args } if name == function && args.len() == arity => Some(args),
            _ => None,
        }
    }

    /// The constant value of this expression, if it is a literal or a tuple
    /// constructor made only of literals.
    pub fn literal_value(&self) -> Option<Value> {
        match self.unparen() {
            Self::Literal { value } => Some(value.clone()),
            Self::List { items } => items
                .iter()
                .map(ConditionExpr::literal_value)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            _ => None,
        }
    }
}

impl fmt::Display for ConditionExpr {
    /// Renders the condition in configuration-language syntax, for diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And { lhs, rhs } => write!(f, "{lhs} && {rhs}"),
            Self::Or { lhs, rhs } => write!(f, "{lhs} || {rhs}"),
            Self::Compare { op, lhs, rhs } => write!(f, "{lhs} {op} {rhs}"),
            Self::Call { name, args } => {
                write!(f, "{name}(")?;
                write_joined(f, args)?;
                f.write_str(")")
            }
            Self::VarRef { name } => write!(f, "var.{name}"),
            Self::Length { target } => write!(f, "length({target})"),
            Self::Literal { value } => write!(f, "{value}"),
            Self::List { items } => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Self::Paren { inner } => write!(f, "({inner})"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[ConditionExpr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
