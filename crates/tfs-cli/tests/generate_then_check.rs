//! End-to-end: `tfs generate` writes a schema for a variable file, then
//! `tfs check` accepts or rejects value documents against it.

use std::path::{Path, PathBuf};

use serde_json::json;
use tfs_cli::check::{run_check, CheckArgs};
use tfs_cli::generate::{run_generate, GenerateArgs};

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn generate_args(input: PathBuf, output: PathBuf) -> GenerateArgs {
    GenerateArgs {
        input,
        output,
        overwrite: false,
        stdout: false,
        disallow_additional_properties: true,
        require_all: false,
        nullable_default: false,
        allow_empty: false,
        ignore: Vec::new(),
        skip_invalid: false,
        config: None,
    }
}

fn variables() -> String {
    json!({
        "variables": [
            {
                "name": "region",
                "type": "string",
                "conditions": [{
                    "kind": "call",
                    "name": "contains",
                    "args": [
                        {"kind": "literal", "value": ["eu-west-1", "us-east-1"]},
                        {"kind": "var_ref", "name": "region"}
                    ]
                }]
            },
            {
                "name": "replicas",
                "type": "number",
                "default": 2,
                "conditions": [{
                    "kind": "compare", "op": ">=",
                    "lhs": {"kind": "var_ref", "name": "replicas"},
                    "rhs": {"kind": "literal", "value": 1}
                }]
            },
            {
                "name": "tags",
                "type": ["map", "string"],
                "nullable": true,
                "default": null
            }
        ]
    })
    .to_string()
}

fn generated_schema(dir: &Path) -> PathBuf {
    let input = write(dir, "variables.json", &variables());
    let output = dir.join("out").join("schema.json");
    assert_eq!(run_generate(&generate_args(input, output.clone())).unwrap(), 0);
    output
}

#[test]
fn test_generated_schema_accepts_conforming_values() {
    let dir = tempfile::tempdir().unwrap();
    let schema = generated_schema(dir.path());

    for (name, values) in [
        ("minimal.json", r#"{"region": "eu-west-1"}"#),
        ("full.json", r#"{"region": "us-east-1", "replicas": 3, "tags": {"team": "core"}}"#),
        ("null_tags.json", r#"{"region": "eu-west-1", "tags": null}"#),
    ] {
        let args = CheckArgs {
            schema: schema.clone(),
            values: write(dir.path(), name, values),
        };
        assert_eq!(run_check(&args).unwrap(), 0, "{name} should conform");
    }
}

#[test]
fn test_generated_schema_rejects_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    let schema = generated_schema(dir.path());

    for (name, values) in [
        ("missing_region.json", r#"{"replicas": 2}"#),
        ("unknown_region.json", r#"{"region": "ap-south-1"}"#),
        ("zero_replicas.json", r#"{"region": "eu-west-1", "replicas": 0}"#),
        ("tag_not_string.json", r#"{"region": "eu-west-1", "tags": {"team": 1}}"#),
        ("extra_key.json", r#"{"region": "eu-west-1", "zone": "a"}"#),
    ] {
        let args = CheckArgs {
            schema: schema.clone(),
            values: write(dir.path(), name, values),
        };
        assert_eq!(run_check(&args).unwrap(), 1, "{name} should be rejected");
    }
}

#[test]
fn test_yaml_variables_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "variables.yaml",
        "variables:\n  - name: size\n    type: [list, number]\n  - name: label\n    type: string\n    default: web\n",
    );
    let schema = dir.path().join("schema.json");
    assert_eq!(run_generate(&generate_args(input, schema.clone())).unwrap(), 0);

    let ok = CheckArgs {
        schema: schema.clone(),
        values: write(dir.path(), "values.yaml", "size: [1, 2]\n"),
    };
    assert_eq!(run_check(&ok).unwrap(), 0);

    let bad = CheckArgs {
        schema,
        values: write(dir.path(), "bad.yaml", "size: [one]\nlabel: web\n"),
    };
    assert_eq!(run_check(&bad).unwrap(), 1);
}
