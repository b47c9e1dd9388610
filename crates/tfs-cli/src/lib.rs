//! # tfs-cli — Command-Line Interface
//!
//! Provides the `tfs` binary. Argument parsing, file I/O and output
//! formatting live here; all translation happens in `tfs-schema`.
//!
//! ## Subcommands
//!
//! - `tfs generate`: write the JSON Schema for a decoded variable file.
//! - `tfs check`: validate a variable-values document against a schema.
//!
//! ```bash
//! tfs generate -i variables.json -o schema.json --overwrite
//! tfs generate -i variables.yaml --stdout --require-all --ignore legacy_flag
//! tfs check --schema schema.json --values terraform.tfvars.json
//! ```
//!
//! Handlers return the process exit code: `0` on success, `1` when a check
//! finds violations. Errors are reported by `main` and also exit with `1`.

pub mod check;
pub mod generate;
pub mod input;
