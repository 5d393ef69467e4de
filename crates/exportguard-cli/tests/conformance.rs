//! Conformance tests for exportguard.
//!
//! These tests validate:
//! 1. All check IDs and codes have explanations
//! 2. All fixture reports are well-formed and use the v1 schema
//! 3. Fixture findings only reference registered check IDs and codes

use exportguard_types::{explain, ids};
use serde_json::Value;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("exportguard-cli should have parent")
        .parent()
        .expect("crates should have parent")
        .join("tests")
        .join("fixtures")
}

fn fixture_reports() -> Vec<(String, Value)> {
    let mut reports = Vec::new();
    for entry in std::fs::read_dir(fixtures_dir()).expect("Failed to read fixtures dir") {
        let entry = entry.expect("Failed to read entry");
        let fixture_dir = entry.path();
        if !fixture_dir.is_dir() {
            continue;
        }

        let report_path = fixture_dir.join("expected.report.json");
        if !report_path.exists() {
            continue;
        }

        let fixture_name = fixture_dir
            .file_name()
            .expect("fixture dir name")
            .to_string_lossy()
            .into_owned();
        let content = std::fs::read_to_string(&report_path)
            .unwrap_or_else(|_| panic!("Failed to read {}", report_path.display()));
        let report: Value = serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Fixture '{}' has invalid JSON: {}", fixture_name, e));
        reports.push((fixture_name, report));
    }

    assert!(!reports.is_empty(), "No fixture reports found");
    reports
}

// =============================================================================
// Explanation Coverage Tests
// =============================================================================

#[test]
fn all_check_ids_have_explanations() {
    for check_id in explain::all_check_ids() {
        let explanation = explain::lookup_explanation(check_id)
            .unwrap_or_else(|| panic!("Check ID '{}' has no explanation in registry", check_id));

        assert!(
            !explanation.title.is_empty(),
            "Check ID '{}' has empty title",
            check_id
        );
        assert!(
            !explanation.description.is_empty(),
            "Check ID '{}' has empty description",
            check_id
        );
        assert!(
            !explanation.remediation.is_empty(),
            "Check ID '{}' has empty remediation",
            check_id
        );
    }
}

#[test]
fn all_codes_have_explanations() {
    for code in explain::all_codes() {
        let explanation = explain::lookup_explanation(code)
            .unwrap_or_else(|| panic!("Code '{}' has no explanation in registry", code));

        assert!(!explanation.title.is_empty(), "Code '{}' has empty title", code);
        assert!(
            !explanation.description.is_empty(),
            "Code '{}' has empty description",
            code
        );
        assert!(
            !explanation.remediation.is_empty(),
            "Code '{}' has empty remediation",
            code
        );
    }
}

#[test]
fn check_ids_and_codes_are_consistent() {
    // Check IDs are dotted, codes are bare snake_case.
    for check_id in explain::all_check_ids() {
        assert!(
            check_id.contains('.'),
            "Check ID '{}' should be dotted (e.g., 'build.entry_points')",
            check_id
        );
    }

    for code in explain::all_codes() {
        assert!(!code.contains('.'), "Code '{}' should not contain dots", code);
        let valid_chars = code.chars().all(|c| c.is_ascii_lowercase() || c == '_');
        assert!(
            valid_chars,
            "Code '{}' should be snake_case (lowercase with underscores)",
            code
        );
    }
}

#[test]
fn known_check_ids_are_documented() {
    let known_check_ids = [ids::CHECK_BUILD_ENTRY_POINTS];

    let registered = explain::all_check_ids();

    for id in &known_check_ids {
        assert!(
            registered.contains(id),
            "Known check ID '{}' is not in all_check_ids()",
            id
        );
    }

    // Catch new checks being added without updating this inventory.
    for id in registered {
        assert!(
            known_check_ids.contains(id),
            "Check ID '{}' in registry but not in known_check_ids test - update the test",
            id
        );
    }
}

#[test]
fn known_codes_are_documented() {
    let known_codes = [
        ids::CODE_SOURCE_ROOT_EXPORT,
        ids::CODE_SOURCE_SUBPATH_EXPORT,
        ids::CODE_SOURCE_MAIN,
        ids::CODE_SOURCE_MODULE,
    ];

    let registered = explain::all_codes();

    for code in &known_codes {
        assert!(
            registered.contains(code),
            "Known code '{}' is not in all_codes()",
            code
        );
    }

    for code in registered {
        assert!(
            known_codes.contains(code),
            "Code '{}' in registry but not in known_codes test - update the test",
            code
        );
    }
}

// =============================================================================
// Fixture Report Validation
// =============================================================================

#[test]
fn all_fixture_reports_have_required_fields() {
    for (fixture_name, report) in fixture_reports() {
        for field in ["schema", "tool", "started_at", "finished_at", "verdict", "findings", "data"]
        {
            assert!(
                report.get(field).is_some(),
                "Fixture '{}' report missing '{}' field",
                fixture_name,
                field
            );
        }

        assert!(
            report["findings"].is_array(),
            "Fixture '{}' findings is not an array",
            fixture_name
        );
    }
}

#[test]
fn all_fixture_reports_use_v1_schema() {
    for (fixture_name, report) in fixture_reports() {
        assert_eq!(
            report["schema"], "exportguard.report.v1",
            "Fixture '{}' has unexpected schema",
            fixture_name
        );
    }
}

#[test]
fn all_fixture_verdicts_are_valid() {
    let valid = ["pass", "warn", "fail"];
    for (fixture_name, report) in fixture_reports() {
        let verdict = report["verdict"].as_str().unwrap_or_else(|| {
            panic!("Fixture '{}' verdict is not a string", fixture_name)
        });
        assert!(
            valid.contains(&verdict),
            "Fixture '{}' has invalid verdict '{}'. Valid: {:?}",
            fixture_name,
            verdict,
            valid
        );
    }
}

#[test]
fn all_fixture_findings_have_valid_ids() {
    // tool.runtime never appears in fixtures; it is only produced when a run breaks.
    let valid_check_ids = explain::all_check_ids();
    let valid_codes = explain::all_codes();

    for (fixture_name, report) in fixture_reports() {
        let Some(findings) = report["findings"].as_array() else {
            continue;
        };
        for (i, finding) in findings.iter().enumerate() {
            if let Some(check_id) = finding["check_id"].as_str() {
                assert!(
                    valid_check_ids.contains(&check_id),
                    "Fixture '{}' finding {} has unknown check_id '{}'",
                    fixture_name,
                    i,
                    check_id
                );
            }
            if let Some(code) = finding["code"].as_str() {
                assert!(
                    valid_codes.contains(&code),
                    "Fixture '{}' finding {} has unknown code '{}'",
                    fixture_name,
                    i,
                    code
                );
            }
        }
    }
}
