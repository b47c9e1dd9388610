//! # tfs-core — Foundational Types for tfs
//!
//! This crate defines the data handed to the schema engine by the external
//! configuration reader, and the value the engine hands back. Every other
//! crate in the workspace depends on `tfs-core`; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Type constraints are a closed sum type.** `TypeConstraint` has one
//!    variant per constraint kind, so every consumer matches exhaustively.
//!    An unknown kind can only appear while decoding the wire form, where it
//!    is a returned `TypeError::UnknownConstraintKind`. A variable whose type
//!    fails to decode still loads as `DeclaredType::Malformed`, so the error
//!    belongs to that variable alone.
//!
//! 2. **Conditions are data, not code.** `ConditionExpr` is a plain AST. The
//!    engine recognizes shapes in it; nothing here evaluates it.
//!
//! 3. **`SchemaNode` is a value.** Builders consume and return the node, so
//!    producing keyword deltas and merging them are separate, testable steps.
//!
//! 4. **Options travel by reference.** `SchemaOptions` is an immutable
//!    configuration object, never global state.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tfs-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod condition;
pub mod constraint;
pub mod error;
pub mod node;
pub mod options;
pub mod variable;

// Re-export primary types for ergonomic imports.
pub use condition::{CompareOp, ConditionExpr};
pub use constraint::{PrimitiveKind, TypeConstraint};
pub use error::TypeError;
pub use node::{json_number, SchemaNode, DRAFT_07_SCHEMA_URI};
pub use options::{SchemaOptions, TypeErrorPolicy};
pub use variable::{DeclaredType, TranslatedVariable, VariableFile};
