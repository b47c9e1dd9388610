//! # tfs-schema — JSON Schema Generation
//!
//! Turns decoded variable blocks into a JSON Schema Draft-07 document that
//! accepts exactly the variable values the module would accept.
//!
//! ## Pipeline
//!
//! - [`types`]: recursive type-constraint translation.
//! - [`nullable`]: the `anyOf: [null, T]` wrapper for nullable variables.
//! - [`rules`]: best-effort recognition of `validation` conditions, merged
//!   into the variable's node as `enum`, `pattern` and bound keywords.
//! - [`assemble`](mod@assemble): the root document, with `required` sorted.
//! - [`validate`]: checking a values document against a generated schema.
//!
//! ## Crate Policy
//!
//! - Depends only on `tfs-core` internally.
//! - Pure transformation: no I/O, no global state. Options are passed by
//!   reference.
//! - A condition that cannot be translated is a diagnostic, never an error.
//!   A malformed type constraint is an error unless the caller opts to skip
//!   the variable.
//! - Output is deterministic: `required` arrays are always sorted.

pub mod assemble;
pub mod error;
pub mod nullable;
pub mod rules;
pub mod types;
pub mod validate;

pub use assemble::{assemble, assemble_with_diagnostics, Assembly, Diagnostic};
pub use error::SchemaError;
pub use rules::{apply, match_condition, merge, ConditionNotApplicable, Rejection, Rule};
pub use types::translate;
pub use validate::{InstanceValidationError, InstanceValidator, ValidationViolations, Violation};
