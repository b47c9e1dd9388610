//! # Validation Rules
//!
//! Best-effort translation of `validation` conditions into JSON Schema
//! keywords. A condition is matched structurally against a fixed list of
//! shapes; nothing is evaluated.
//!
//! ## Priority
//!
//! Rules are tried in [`Rule::PRIORITY`] order and the first one that
//! recognizes the condition wins:
//!
//! 1. [`Rule::Membership`]: `contains([...], var.x)` → `enum`
//! 2. [`Rule::EqualityChain`]: `var.x == a || var.x == b` → `enum`
//! 3. [`Rule::RangeChain`]: `var.x >= a && length(var.x) < b` → bounds
//! 4. [`Rule::RegexCall`]: `can(regex("...", var.x))` → `pattern`
//!
//! ## Merging
//!
//! A rule produces a delta node; [`merge`] folds it into the target node.
//! Bound keywords keep whichever of the old and new value is tighter;
//! every other keyword is overwritten.

mod equality;
mod membership;
mod pattern;
mod range;

use std::fmt;

use thiserror::Error;
use tfs_core::{ConditionExpr, SchemaNode};

pub use range::{bound_kind, tighter, Bound};

/// A condition shape the matcher knows how to translate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    Membership,
    EqualityChain,
    RangeChain,
    RegexCall,
}

impl Rule {
    /// The order in which rules are tried.
    pub const PRIORITY: [Rule; 4] = [
        Rule::Membership,
        Rule::EqualityChain,
        Rule::RangeChain,
        Rule::RegexCall,
    ];

    /// The shape this rule recognizes, for diagnostics.
    pub fn shape(self) -> &'static str {
        match self {
            Self::Membership => "contains([...], var.input_parameter)",
            Self::EqualityChain => "var == \"a\" || var == \"b\"",
            Self::RangeChain => "a <>= (variable or variable length) (&& ...)",
            Self::RegexCall => "can(regex(\"...\", var.input_parameter))",
        }
    }

    /// Try to recognize `condition` as this rule's shape.
    ///
    /// `type_name` is the concrete `type` of the node the keywords will be
    /// merged into, if it has one.
    pub fn recognize(
        self,
        condition: &ConditionExpr,
        name: &str,
        type_name: Option<&str>,
    ) -> Result<SchemaNode, String> {
        match self {
            Self::Membership => membership::recognize(condition, name),
            Self::EqualityChain => equality::recognize(condition, name),
            Self::RangeChain => range::recognize(condition, name, type_name),
            Self::RegexCall => pattern::recognize(condition, name, type_name),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shape())
    }
}

/// Why one rule did not recognize a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub rule: Rule,
    pub reason: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {}", self.rule, self.reason)
    }
}

/// No rule recognized the condition. Non-fatal: the node is left as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no translation rules are supported for condition `{condition}`")]
pub struct ConditionNotApplicable {
    /// The condition in source syntax.
    pub condition: String,
    /// One rejection per rule, in priority order.
    pub rejections: Vec<Rejection>,
}

impl ConditionNotApplicable {
    /// The reason `rule` gave, if it was tried.
    pub fn reason(&self, rule: Rule) -> Option<&str> {
        self.rejections
            .iter()
            .find(|r| r.rule == rule)
            .map(|r| r.reason.as_str())
    }

    /// Every rejection, one per line.
    pub fn details(&self) -> String {
        self.rejections
            .iter()
            .map(Rejection::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Find the first rule that recognizes `condition` and return its delta.
///
/// # Errors
///
/// Returns `ConditionNotApplicable` with every rule's reason when none match.
pub fn match_condition(
    condition: &ConditionExpr,
    name: &str,
    node: &SchemaNode,
) -> Result<SchemaNode, ConditionNotApplicable> {
    let type_name = node.type_name();
    let mut rejections = Vec::with_capacity(Rule::PRIORITY.len());
    for rule in Rule::PRIORITY {
        match rule.recognize(condition, name, type_name) {
            Ok(delta) => return Ok(delta),
            Err(reason) => rejections.push(Rejection { rule, reason }),
        }
    }
    Err(ConditionNotApplicable {
        condition: condition.to_string(),
        rejections,
    })
}

/// Translate `condition` and merge the resulting keywords into `node`.
///
/// # Errors
///
/// Returns `ConditionNotApplicable` when no rule matches; the caller keeps
/// its original node.
pub fn apply(
    condition: &ConditionExpr,
    name: &str,
    node: SchemaNode,
) -> Result<SchemaNode, ConditionNotApplicable> {
    let delta = match_condition(condition, name, &node)?;
    Ok(merge(node, delta))
}

/// Fold `delta` into `node`.
///
/// Bound keywords (see [`bound_kind`]) already present with a numeric value
/// are only replaced by a strictly tighter bound. Everything else in `delta`
/// overwrites `node`.
pub fn merge(node: SchemaNode, delta: SchemaNode) -> SchemaNode {
    delta.into_iter().fold(node, |node, (keyword, value)| {
        let keep_existing = match (bound_kind(&keyword), node.number(&keyword), value.as_f64()) {
            (Some(bound), Some(current), Some(candidate)) => !tighter(bound, current, candidate),
            _ => false,
        };
        if keep_existing {
            node
        } else {
            node.with(keyword, value)
        }
    })
}
