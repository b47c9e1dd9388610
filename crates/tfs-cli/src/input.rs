//! # Input Documents
//!
//! Every file the CLI reads is JSON or YAML, chosen by extension
//! (`.yaml`/`.yml` is YAML, anything else is JSON).

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tfs_core::{SchemaOptions, VariableFile};

/// True if `path` has a YAML extension.
pub fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

/// Read and decode a JSON or YAML document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if is_yaml(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML in {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))
    }
}

/// Load the decoded variable blocks of a module.
pub fn load_variables(path: &Path) -> Result<VariableFile> {
    let file: VariableFile = read_document(path)?;
    tracing::debug!(path = %path.display(), variables = file.variables.len(), "loaded variable file");
    Ok(file)
}

/// Load generation options from a config file.
pub fn load_options(path: &Path) -> Result<SchemaOptions> {
    read_document(path).with_context(|| format!("invalid config file {}", path.display()))
}

/// Load an arbitrary JSON or YAML value (a schema or a values document).
pub fn load_value(path: &Path) -> Result<Value> {
    read_document(path)
}
