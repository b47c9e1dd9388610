//! # tfs CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tfs_cli::check::{run_check, CheckArgs};
use tfs_cli::generate::{run_generate, GenerateArgs};

/// Generate JSON Schema for module input variables.
///
/// Reads decoded variable blocks (type constraints, defaults, nullability and
/// validation conditions) and writes a Draft-07 schema that accepts the same
/// variable values.
#[derive(Parser, Debug)]
#[command(name = "tfs", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a JSON Schema from a variable file.
    Generate(GenerateArgs),

    /// Check a variable-values document against a generated schema.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Generate(args) => run_generate(&args),
        Commands::Check(args) => run_check(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_generate_defaults() {
        let cli = Cli::try_parse_from(["tfs", "generate", "-i", "vars.json"]).unwrap();
        assert_eq!(cli.verbose, 0);
        if let Commands::Generate(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("vars.json"));
            assert_eq!(args.output, PathBuf::from("schema.json"));
            assert!(!args.overwrite);
            assert!(!args.stdout);
            assert!(args.ignore.is_empty());
            assert!(args.config.is_none());
        } else {
            panic!("expected generate");
        }
    }

    #[test]
    fn cli_parse_generate_all_flags() {
        let cli = Cli::try_parse_from([
            "tfs",
            "-vv",
            "generate",
            "--input",
            "vars.yaml",
            "-o",
            "out/schema.json",
            "--overwrite",
            "--disallow-additional-properties",
            "--require-all",
            "--nullable-default",
            "--allow-empty",
            "--skip-invalid",
            "--config",
            "tfs.yaml",
            "--ignore",
            "a",
            "b",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        if let Commands::Generate(args) = cli.command {
            assert_eq!(args.output, PathBuf::from("out/schema.json"));
            assert!(args.overwrite);
            assert!(args.disallow_additional_properties);
            assert!(args.require_all);
            assert!(args.nullable_default);
            assert!(args.allow_empty);
            assert!(args.skip_invalid);
            assert_eq!(args.config, Some(PathBuf::from("tfs.yaml")));
            assert_eq!(args.ignore, vec!["a".to_string(), "b".to_string()]);
        } else {
            panic!("expected generate");
        }
    }

    #[test]
    fn cli_parse_generate_requires_input() {
        assert!(Cli::try_parse_from(["tfs", "generate"]).is_err());
    }

    #[test]
    fn cli_parse_check() {
        let cli = Cli::try_parse_from([
            "tfs",
            "check",
            "--schema",
            "schema.json",
            "--values",
            "values.json",
        ])
        .unwrap();
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.schema, PathBuf::from("schema.json"));
            assert_eq!(args.values, PathBuf::from("values.json"));
        } else {
            panic!("expected check");
        }
    }

    #[test]
    fn cli_parse_unknown_subcommand_fails() {
        assert!(Cli::try_parse_from(["tfs", "lock"]).is_err());
    }
}
