//! Developer tasks (schema generation, fixture verification).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            // Fallback: assume we're in xtask dir or use current dir
            std::env::current_dir().expect("Cannot determine current directory")
        });

    // If we're in the xtask directory, go up one level
    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .expect("xtask has no parent")
            .to_path_buf()
    } else {
        manifest_dir
    }
}

/// Get the schemas directory path.
fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(exportguard_types::ExportguardReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(exportguard_settings::ExportguardConfigV1)
}

/// List of schemas to generate.
fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "exportguard.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "exportguard.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();

    if !dir.exists() {
        fs::create_dir_all(&dir).context("Failed to create schemas directory")?;
    }

    for spec in schema_specs() {
        let schema = (spec.generate)();
        let json = serialize_schema(&schema)?;
        let path = dir.join(spec.filename);

        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;

        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut all_match = true;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);

        if !path.exists() {
            missing.push(spec.filename);
            all_match = false;
            continue;
        }

        let schema = (spec.generate)();
        let expected = serialize_schema(&schema)?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if expected != actual {
            mismatched.push(spec.filename);
            all_match = false;
        }
    }

    if all_match {
        println!("All schemas are up to date.");
        Ok(())
    } else {
        if !missing.is_empty() {
            eprintln!("Missing schemas:");
            for name in &missing {
                eprintln!("  - {}", name);
            }
        }
        if !mismatched.is_empty() {
            eprintln!("Schemas out of date:");
            for name in &mismatched {
                eprintln!("  - {}", name);
            }
        }
        eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
        bail!("Schema validation failed")
    }
}

/// Run the built exportguard binary against every test fixture and compare the
/// produced report against the fixture's golden expected.report.json.
fn verify_fixtures() -> anyhow::Result<()> {
    let exportguard_bin = project_root()
        .join("target")
        .join("debug")
        .join("exportguard");

    #[cfg(target_os = "windows")]
    let exportguard_bin = exportguard_bin.with_extension("exe");

    if !exportguard_bin.exists() {
        bail!(
            "exportguard binary not found at {}.\n\
            Run `cargo build -p exportguard-cli` first.",
            exportguard_bin.display()
        );
    }

    let fixtures_dir = project_root().join("tests").join("fixtures");
    let mut checked = 0;
    let mut errors = Vec::new();

    for entry in fs::read_dir(&fixtures_dir).context("Failed to read tests/fixtures/")? {
        let entry = entry?;
        let fixture_dir = entry.path();
        if !fixture_dir.is_dir() {
            continue;
        }

        let golden_path = fixture_dir.join("expected.report.json");
        if !golden_path.exists() {
            continue;
        }

        let fixture_name = fixture_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let report_out = temp_dir.path().join("report.json");

        let output = std::process::Command::new(&exportguard_bin)
            .args([
                "--workspace-root",
                fixture_dir.to_str().unwrap_or_default(),
                "check",
                "--report-out",
                report_out.to_str().unwrap_or_default(),
            ])
            .output()
            .with_context(|| format!("Failed to run exportguard on fixture '{}'", fixture_name))?;

        // Exit 1 means a runtime error; 0 and 2 are legitimate verdicts.
        if output.status.code() == Some(1) {
            errors.push(format!(
                "fixture '{}': exportguard hit a runtime error: {}",
                fixture_name,
                String::from_utf8_lossy(&output.stderr)
            ));
            continue;
        }

        if !report_out.exists() {
            errors.push(format!(
                "fixture '{}': no report output generated",
                fixture_name
            ));
            continue;
        }

        let report_content = fs::read_to_string(&report_out)?;
        let report_value: serde_json::Value = serde_json::from_str(&report_content)
            .with_context(|| format!("Failed to parse report for fixture '{}'", fixture_name))?;

        let golden_content = fs::read_to_string(&golden_path)?;
        let golden_value: serde_json::Value = serde_json::from_str(&golden_content)
            .with_context(|| format!("Failed to parse golden report for '{}'", fixture_name))?;

        let normalized_report = exportguard_test_util::normalize_nondeterministic(report_value);
        let normalized_golden = exportguard_test_util::normalize_nondeterministic(golden_value);

        if normalized_report != normalized_golden {
            errors.push(format!(
                "fixture '{}': output differs from golden file expected.report.json",
                fixture_name
            ));
        } else {
            println!("  ✓ fixture '{}' matches golden report", fixture_name);
        }

        checked += 1;
    }

    if checked == 0 {
        bail!(
            "No fixtures with golden reports found in {}",
            fixtures_dir.display()
        );
    }

    if !errors.is_empty() {
        eprintln!("\nFixture verification errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Fixture verification failed with {} errors", errors.len());
    }

    println!("\n✓ All {} fixtures match their golden reports!", checked);
    Ok(())
}

/// Validate that all check IDs and codes have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    let check_ids = exportguard_types::explain::all_check_ids();
    let codes = exportguard_types::explain::all_codes();

    let mut errors = Vec::new();

    for identifier in check_ids.iter().chain(codes.iter()) {
        match exportguard_types::explain::lookup_explanation(identifier) {
            Some(exp) => {
                if exp.title.is_empty() {
                    errors.push(format!("'{}' has empty title", identifier));
                }
                if exp.description.is_empty() {
                    errors.push(format!("'{}' has empty description", identifier));
                }
                if exp.remediation.is_empty() {
                    errors.push(format!("'{}' has empty remediation", identifier));
                }
            }
            None => {
                errors.push(format!("'{}' has no explanation", identifier));
            }
        }
    }

    if errors.is_empty() {
        println!("✓ {} check IDs have explanations", check_ids.len());
        println!("✓ {} codes have explanations", codes.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  verify-fixtures   Run the built exportguard binary against tests/fixtures/");
    eprintln!("  explain-coverage  Validate all check IDs and codes have explanations");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "verify-fixtures" => verify_fixtures(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                let name = spec.filename.trim_end_matches(".json");
                println!("{}", name);
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
