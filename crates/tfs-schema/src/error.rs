//! # Schema Generation Errors
//!
//! Fatal outcomes of assembling a root schema. Conditions that cannot be
//! translated are not errors; see [`crate::Diagnostic`].

use thiserror::Error;
use tfs_core::TypeError;

/// Error produced by [`crate::assemble`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// A variable's type constraint could not be translated.
    #[error("variable \"{variable}\": {source}")]
    Variable {
        /// Name of the offending variable.
        variable: String,
        #[source]
        source: TypeError,
    },

    /// Nothing to put in the schema and empty output was not allowed.
    #[error("no variables to translate (set allow_empty to produce an empty schema)")]
    NoVariables,

    /// Two variables share a name.
    #[error("variable \"{0}\" is declared more than once")]
    DuplicateVariable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_variable_error_display_and_source() {
        let err = SchemaError::Variable {
            variable: "tags".to_string(),
            source: TypeError::structural("optional attribute \"x\" is not declared").within("object"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("variable \"tags\": "), "got: {msg}");
        assert!(msg.contains("object"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_duplicate_display() {
        assert_eq!(
            SchemaError::DuplicateVariable("region".into()).to_string(),
            "variable \"region\" is declared more than once"
        );
    }
}
