//! # Schema Assembly
//!
//! Builds the root Draft-07 document from every variable of a module.
//!
//! Per variable, in order:
//!
//! 1. translate the type constraint, wrapped if the variable is nullable; a
//!    type that failed to decode is a type error here, subject to
//!    `on_type_error`
//! 2. attach `default` when one is declared (including an explicit `null`)
//! 3. apply each condition in declaration order; inapplicable conditions are
//!    logged and reported as diagnostics
//! 4. attach `description`
//! 5. drop the nullable wrapper's scaffolding `type`
//!
//! The root `required` array is the sorted names of variables without a
//! default, or every name under `require_all`.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::{Map, Value};
use tfs_core::{
    SchemaNode, SchemaOptions, TranslatedVariable, TypeError, TypeErrorPolicy, DRAFT_07_SCHEMA_URI,
};
use tracing::{debug, warn};

use crate::error::SchemaError;
use crate::nullable;
use crate::rules::{self, ConditionNotApplicable};
use crate::types;

/// Root keywords that `root_properties` can never replace.
const RESERVED_ROOT_KEYWORDS: [&str; 5] = [
    "$schema",
    "type",
    "additionalProperties",
    "properties",
    "required",
];

/// A non-fatal event recorded while assembling.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A condition was left out of the variable's schema.
    ConditionNotApplicable {
        variable: String,
        cause: ConditionNotApplicable,
    },
    /// A variable was left out of the schema under `on_type_error = skip`.
    VariableSkipped { variable: String, cause: TypeError },
}

impl Diagnostic {
    /// The variable the diagnostic concerns.
    pub fn variable(&self) -> &str {
        match self {
            Self::ConditionNotApplicable { variable, .. } | Self::VariableSkipped { variable, .. } => {
                variable
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConditionNotApplicable { variable, cause } => {
                writeln!(f, "variable \"{variable}\": {cause}")?;
                write!(f, "{}", cause.details())
            }
            Self::VariableSkipped { variable, cause } => {
                write!(f, "variable \"{variable}\" skipped: {cause}")
            }
        }
    }
}

/// The root schema plus everything worth reporting about how it was built.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub schema: SchemaNode,
    pub diagnostics: Vec<Diagnostic>,
}

/// Assemble the root schema for `variables`.
///
/// # Errors
///
/// See [`assemble_with_diagnostics`].
pub fn assemble(
    variables: &[TranslatedVariable],
    options: &SchemaOptions,
) -> Result<SchemaNode, SchemaError> {
    assemble_with_diagnostics(variables, options).map(|assembly| assembly.schema)
}

/// Assemble the root schema for `variables` and collect diagnostics.
///
/// # Errors
///
/// - `SchemaError::DuplicateVariable` if two variables share a name.
/// - `SchemaError::Variable` if a type constraint is malformed and
///   `on_type_error` is `fail`.
/// - `SchemaError::NoVariables` if no variable remains and `allow_empty` is
///   off.
pub fn assemble_with_diagnostics(
    variables: &[TranslatedVariable],
    options: &SchemaOptions,
) -> Result<Assembly, SchemaError> {
    let mut seen = BTreeSet::new();
    if let Some(dup) = variables.iter().find(|v| !seen.insert(v.name.as_str())) {
        return Err(SchemaError::DuplicateVariable(dup.name.clone()));
    }

    let mut diagnostics = Vec::new();
    let mut properties = Map::new();
    let mut required = Vec::new();

    for variable in variables {
        if options.is_ignored(&variable.name) {
            debug!(variable = %variable.name, "ignoring variable");
            continue;
        }

        let node = match variable_node(variable, options, &mut diagnostics) {
            Ok(node) => node,
            Err(source) => match options.on_type_error {
                TypeErrorPolicy::Fail => {
                    return Err(SchemaError::Variable {
                        variable: variable.name.clone(),
                        source,
                    })
                }
                TypeErrorPolicy::Skip => {
                    warn!(variable = %variable.name, error = %source, "skipping variable with malformed type");
                    diagnostics.push(Diagnostic::VariableSkipped {
                        variable: variable.name.clone(),
                        cause: source,
                    });
                    continue;
                }
            },
        };

        if options.require_all || variable.is_required() {
            required.push(variable.name.clone());
        }
        properties.insert(variable.name.clone(), node.into_value());
    }

    if properties.is_empty() && !options.allow_empty {
        return Err(SchemaError::NoVariables);
    }
    required.sort();

    debug!(
        variables = properties.len(),
        diagnostics = diagnostics.len(),
        "assembled root schema"
    );
    let schema = root_node(properties, required, options);
    Ok(Assembly {
        schema,
        diagnostics,
    })
}

/// Build the schema node for one variable.
fn variable_node(
    variable: &TranslatedVariable,
    options: &SchemaOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<SchemaNode, TypeError> {
    let name = variable.name.as_str();
    let nullable = variable.is_nullable(options.nullable_default);
    let constraint = variable.type_constraint.constraint()?;
    debug!(variable = name, constraint = %constraint, nullable, "translating variable");

    let mut node = types::translate(name, constraint, nullable, options)?;

    if let Some(default) = &variable.default {
        node = node.with("default", default.clone());
    }

    for condition in &variable.conditions {
        node = match rules::match_condition(condition, name, &node) {
            Ok(delta) => rules::merge(node, delta),
            Err(cause) => {
                warn!(
                    variable = name,
                    condition = %cause.condition,
                    "validation condition not translated:\n{}",
                    cause.details()
                );
                diagnostics.push(Diagnostic::ConditionNotApplicable {
                    variable: name.to_string(),
                    cause,
                });
                node
            }
        };
    }

    if let Some(description) = &variable.description {
        node = node.with("description", description.as_str());
    }

    if nullable {
        node = nullable::strip_scaffolding(node);
    }
    Ok(node)
}

fn root_node(properties: Map<String, Value>, required: Vec<String>, options: &SchemaOptions) -> SchemaNode {
    let mut root = SchemaNode::new().with("$schema", DRAFT_07_SCHEMA_URI);
    for (keyword, value) in &options.root_properties {
        if RESERVED_ROOT_KEYWORDS.contains(&keyword.as_str()) {
            warn!(keyword = %keyword, "root property would replace a generated keyword; skipping");
            continue;
        }
        root.insert(keyword.clone(), value.clone());
    }
    root.with("type", "object")
        .with("additionalProperties", options.allow_additional_properties)
        .with("properties", properties)
        .with("required", required)
}
