//! # Check CLI — validate variable values against a generated schema.
//!
//! ```bash
//! tfs check --schema schema.json --values terraform.tfvars.json
//! ```
//!
//! Exits `0` when the values conform and `1` after listing every violation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tfs_schema::InstanceValidator;

use crate::input;

/// Arguments for `tfs check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema produced by `tfs generate`.
    #[arg(long)]
    pub schema: PathBuf,

    /// Variable values (JSON, or YAML by extension).
    #[arg(long)]
    pub values: PathBuf,
}

/// Execute `tfs check`.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let schema = input::load_value(&args.schema)?;
    let values = input::load_value(&args.values)?;

    let validator = InstanceValidator::new(&schema)
        .with_context(|| format!("failed to compile schema {}", args.schema.display()))?;
    let violations = validator.violations(&values);

    if violations.is_empty() {
        println!("OK: {} conforms to {}", args.values.display(), args.schema.display());
        return Ok(0);
    }

    println!(
        "FAIL: {} has {} violation(s) against {}",
        args.values.display(),
        violations.len(),
        args.schema.display()
    );
    let variables = violations.variables();
    if !variables.is_empty() {
        let names: Vec<&str> = variables.iter().map(String::as_str).collect();
        println!("Variables with violations: {}", names.join(", "));
    }
    println!("{violations}");
    Ok(1)
}
