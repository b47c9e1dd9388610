//! # Instance Validation
//!
//! Checks a variable-values document (a `terraform.tfvars.json` style
//! object) against a generated root schema, using the `jsonschema` crate in
//! Draft 7 mode.
//!
//! Invalid documents are reported with every violation: the instance path,
//! the schema path that rejected it and a message.

use std::collections::BTreeSet;
use std::fmt;

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;
use tfs_core::SchemaNode;

/// Error from building a validator or validating an instance.
#[derive(Error, Debug)]
pub enum InstanceValidationError {
    /// The instance did not conform to the schema.
    #[error("validation failed:\n{violations}")]
    ValidationFailed {
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The schema could not be compiled.
    #[error("validator build error: {reason}")]
    ValidatorBuild {
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Violation {
    /// The top-level variable the violating value belongs to, decoded from
    /// the first JSON Pointer segment of `instance_path`.
    pub fn variable(&self) -> Option<String> {
        let segment = self.instance_path.strip_prefix('/')?.split('/').next()?;
        Some(segment.replace("~1", "/").replace("~0", "~"))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True if the instance conformed.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The violations in the order the validator reported them.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consume and return the underlying violations.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }

    /// Names of the variables with at least one violation, sorted.
    ///
    /// Root-level violations (a missing required variable, an unexpected
    /// key when additional properties are disallowed) carry no variable and
    /// are left out.
    pub fn variables(&self) -> BTreeSet<String> {
        self.violations
            .iter()
            .filter_map(Violation::variable)
            .collect()
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A compiled Draft-07 validator for one generated schema.
pub struct InstanceValidator {
    validator: Validator,
}

impl fmt::Debug for InstanceValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceValidator").finish_non_exhaustive()
    }
}

impl InstanceValidator {
    /// Compile `schema`.
    ///
    /// # Errors
    ///
    /// Returns `InstanceValidationError::ValidatorBuild` if the schema is not
    /// a valid Draft-07 document.
    pub fn new(schema: &Value) -> Result<Self, InstanceValidationError> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft7);
        let validator = opts
            .build(schema)
            .map_err(|e| InstanceValidationError::ValidatorBuild {
                reason: e.to_string(),
            })?;
        Ok(Self { validator })
    }

    /// Compile a root schema produced by [`crate::assemble`].
    ///
    /// # Errors
    ///
    /// See [`InstanceValidator::new`].
    pub fn from_node(schema: &SchemaNode) -> Result<Self, InstanceValidationError> {
        Self::new(&Value::Object(schema.as_map().clone()))
    }

    /// True if `instance` conforms.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Every violation in `instance`, empty when it conforms.
    pub fn violations(&self, instance: &Value) -> ValidationViolations {
        let violations = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();
        ValidationViolations { violations }
    }

    /// Validate `instance`.
    ///
    /// # Errors
    ///
    /// Returns `InstanceValidationError::ValidationFailed` listing every
    /// violation if the instance does not conform.
    pub fn validate(&self, instance: &Value) -> Result<(), InstanceValidationError> {
        let violations = self.violations(instance);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(InstanceValidationError::ValidationFailed { violations })
        }
    }
}
