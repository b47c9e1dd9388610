//! # Error Types
//!
//! Errors raised while decoding or translating a type constraint. Condition
//! recognition never fails hard, so its diagnostics live in `tfs-schema`
//! next to the matcher.

use thiserror::Error;

/// A malformed or unsupported type-constraint tree.
///
/// Both variants are fatal to the translation of the variable that carries
/// the constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// The tree has the wrong shape: bad arity, a non-map attribute set,
    /// or an optional attribute that the object does not declare.
    #[error("structural type error{}: {reason}", display_path(.path))]
    Structural {
        /// Location of the offending node, outermost first (e.g. `object.tags/map`).
        path: String,
        /// What is wrong with the node.
        reason: String,
    },

    /// The tree names a constraint kind this translator does not know.
    #[error("unknown type constraint kind {kind:?}{}", display_path(.path))]
    UnknownConstraintKind {
        /// Location of the offending node.
        path: String,
        /// The kind as it appeared in the input.
        kind: String,
    },
}

impl TypeError {
    /// A structural error at the current node.
    pub fn structural(reason: impl Into<String>) -> Self {
        Self::Structural {
            path: String::new(),
            reason: reason.into(),
        }
    }

    /// An unknown-kind error at the current node.
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        Self::UnknownConstraintKind {
            path: String::new(),
            kind: kind.into(),
        }
    }

    /// Prefix the error location with the enclosing node's segment.
    ///
    /// Called while unwinding a recursive walk, so the outermost segment is
    /// prepended last and ends up first.
    pub fn within(self, segment: impl AsRef<str>) -> Self {
        let prefix = |path: String| {
            if path.is_empty() {
                segment.as_ref().to_string()
            } else {
                format!("{}/{}", segment.as_ref(), path)
            }
        };
        match self {
            Self::Structural { path, reason } => Self::Structural {
                path: prefix(path),
                reason,
            },
            Self::UnknownConstraintKind { path, kind } => Self::UnknownConstraintKind {
                path: prefix(path),
                kind,
            },
        }
    }

    /// The location of the offending node, empty for the root.
    pub fn path(&self) -> &str {
        match self {
            Self::Structural { path, .. } | Self::UnknownConstraintKind { path, .. } => path,
        }
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at {path}")
    }
}
