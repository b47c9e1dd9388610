//! # Generate CLI — write the JSON Schema for a variable file.
//!
//! ```bash
//! tfs generate -i variables.json                      # writes ./schema.json
//! tfs generate -i variables.yaml -o out/schema.json --overwrite
//! tfs generate -i variables.json --stdout --disallow-additional-properties
//! tfs generate -i variables.json --config tfs.yaml --ignore legacy --skip-invalid
//! ```
//!
//! Options come from `--config` when given, then flags switch individual
//! settings on. A flag never turns a config setting off.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use tfs_core::{SchemaOptions, TypeErrorPolicy};
use tfs_schema::assemble_with_diagnostics;

use crate::input;

/// Arguments for `tfs generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Decoded variable file (JSON, or YAML by extension).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the schema.
    #[arg(short, long, default_value = "schema.json")]
    pub output: PathBuf,

    /// Replace the output file if it already exists.
    #[arg(long)]
    pub overwrite: bool,

    /// Print the schema to stdout instead of writing a file.
    #[arg(long)]
    pub stdout: bool,

    /// Set `additionalProperties: false` on the root and every object type.
    #[arg(long)]
    pub disallow_additional_properties: bool,

    /// Treat every variable and object attribute as required.
    #[arg(long)]
    pub require_all: bool,

    /// Treat variables that do not declare `nullable` as nullable.
    #[arg(long)]
    pub nullable_default: bool,

    /// Produce an empty schema instead of failing when there are no variables.
    #[arg(long)]
    pub allow_empty: bool,

    /// Leave the named variables out of the schema.
    #[arg(long = "ignore", value_name = "NAME", num_args = 1..)]
    pub ignore: Vec<String>,

    /// Skip variables with malformed types instead of failing.
    #[arg(long)]
    pub skip_invalid: bool,

    /// Options file (JSON or YAML) with `SchemaOptions` fields.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl GenerateArgs {
    /// Resolve the effective options: config file first, then flags.
    pub fn schema_options(&self) -> Result<SchemaOptions> {
        let mut options = match &self.config {
            Some(path) => input::load_options(path)?,
            None => SchemaOptions::default(),
        };

        if self.disallow_additional_properties {
            options.allow_additional_properties = false;
        }
        options.require_all |= self.require_all;
        options.nullable_default |= self.nullable_default;
        options.allow_empty |= self.allow_empty;
        options.ignore_variables.extend(self.ignore.iter().cloned());
        if self.skip_invalid {
            options.on_type_error = TypeErrorPolicy::Skip;
        }
        Ok(options)
    }
}

/// Execute `tfs generate`.
pub fn run_generate(args: &GenerateArgs) -> Result<u8> {
    let options = args.schema_options()?;
    if !args.stdout {
        check_output_path(&args.output, args.overwrite)?;
    }

    let file = input::load_variables(&args.input)?;
    let assembly = assemble_with_diagnostics(&file.variables, &options)
        .with_context(|| format!("failed to generate schema for {}", args.input.display()))?;
    if !assembly.diagnostics.is_empty() {
        tracing::info!(
            count = assembly.diagnostics.len(),
            "schema generated with diagnostics"
        );
    }

    let mut rendered = serde_json::to_string_pretty(&assembly.schema)
        .context("failed to serialize schema")?;
    rendered.push('\n');

    if args.stdout {
        print!("{rendered}");
        return Ok(0);
    }

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(&args.output, rendered)
        .with_context(|| format!("failed to write schema: {}", args.output.display()))?;

    println!("Schema written to {}", args.output.display());
    Ok(0)
}

/// Refuse outputs that would clobber something.
fn check_output_path(output: &Path, overwrite: bool) -> Result<()> {
    if output.is_dir() {
        bail!("output path {} is a directory", output.display());
    }
    if output.exists() && !overwrite {
        bail!(
            "output file {} already exists; pass --overwrite to replace it",
            output.display()
        );
    }
    let is_json = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        tracing::warn!(output = %output.display(), "output file does not have a .json extension");
    }
    Ok(())
}
