use crate::engine::evaluate;
use crate::model::WorkspaceModel;
use crate::test_support::{config_with, manifest_json, project};
use exportguard_types::{Finding, Severity, WorkspacePath, ids};

fn workspace(projects: Vec<crate::model::ProjectModel>) -> WorkspaceModel {
    WorkspaceModel {
        workspace_root: WorkspacePath::new("."),
        projects,
    }
}

fn findings_for(manifest_json_text: &str, include: Vec<String>) -> Vec<Finding> {
    let model = workspace(vec![project(
        "packages/app",
        Some(manifest_json(manifest_json_text)),
        include,
    )]);
    evaluate(&model, &config_with(Severity::Error, Vec::new())).findings
}

#[test]
fn source_root_export_is_flagged() {
    let findings = findings_for(r#"{ "exports": "./src/index.ts" }"#, Vec::new());
    assert_eq!(findings.len(), 1);
    let f = &findings[0];
    assert_eq!(f.check_id, ids::CHECK_BUILD_ENTRY_POINTS);
    assert_eq!(f.code, ids::CODE_SOURCE_ROOT_EXPORT);
    assert_eq!(
        f.location.as_ref().map(|l| l.path.as_str()),
        Some("packages/app/package.json")
    );
    assert!(f.message.contains("./src/index.ts"));
    assert!(f.fingerprint.is_some());
}

#[test]
fn include_patterns_override_extension_inspection() {
    // A .ts path outside the include list is build output, not source.
    let findings = findings_for(
        r#"{ "exports": "./dist/index.ts" }"#,
        vec!["src/**/*.ts".to_string()],
    );
    assert!(findings.is_empty());

    let findings = findings_for(
        r#"{ "exports": "./src/index.ts" }"#,
        vec!["src/**/*.ts".to_string()],
    );
    assert_eq!(findings.len(), 1);
}

#[test]
fn root_export_alone_gates_when_present() {
    // "." is clean, so the source-referencing subpath is not consulted.
    let findings = findings_for(
        r#"{ "exports": { ".": "./dist/index.js", "./extra": "./src/extra.ts" } }"#,
        Vec::new(),
    );
    assert!(findings.is_empty());
}

#[test]
fn every_subpath_gates_without_a_root_export() {
    let findings = findings_for(
        r#"{ "exports": { "./a": "./dist/a.js", "./b": "./src/b.ts" } }"#,
        Vec::new(),
    );
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].code, ids::CODE_SOURCE_SUBPATH_EXPORT);
    assert_eq!(findings[0].data["subpath"], "./b");
}

#[test]
fn types_and_development_conditions_are_skipped() {
    let findings = findings_for(
        r#"{
            "exports": {
                ".": {
                    "types": "./src/index.ts",
                    "development": "./src/index.ts",
                    "import": "./dist/index.js"
                }
            }
        }"#,
        Vec::new(),
    );
    assert!(findings.is_empty());
}

#[test]
fn non_ignored_condition_inside_root_export_is_flagged() {
    let findings = findings_for(
        r#"{ "exports": { ".": { "import": "./src/index.ts" } } }"#,
        Vec::new(),
    );
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].code, ids::CODE_SOURCE_ROOT_EXPORT);
    assert_eq!(findings[0].data["condition"], "import");
    assert!(findings[0].message.contains("exports (import)"));
}

#[test]
fn conditions_nested_deeper_than_one_level_are_not_walked() {
    let findings = findings_for(
        r#"{ "exports": { ".": { "node": { "import": "./src/index.ts" } } } }"#,
        Vec::new(),
    );
    assert!(findings.is_empty());
}

#[test]
fn main_and_module_gate_when_exports_is_absent() {
    let findings = findings_for(
        r#"{ "main": "./src/index.ts", "module": "./dist/index.js" }"#,
        Vec::new(),
    );
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].code, ids::CODE_SOURCE_MAIN);

    let findings = findings_for(r#"{ "module": "./src/index.mts" }"#, Vec::new());
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].code, ids::CODE_SOURCE_MODULE);
}

#[test]
fn manifest_without_entry_points_is_clean() {
    let findings = findings_for(r#"{ "name": "tooling-only" }"#, Vec::new());
    assert!(findings.is_empty());
}

#[test]
fn allowlisted_project_roots_are_exempt() {
    let manifest = manifest_json(r#"{ "exports": "./src/index.ts" }"#);
    let model = workspace(vec![
        project("packages/app", Some(manifest.clone()), Vec::new()),
        project("packages/fixtures/broken", Some(manifest), Vec::new()),
    ]);
    let cfg = config_with(Severity::Error, vec!["packages/fixtures/**".to_string()]);
    let report = evaluate(&model, &cfg);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(
        report.findings[0].location.as_ref().map(|l| l.path.as_str()),
        Some("packages/app/package.json")
    );
}

#[test]
fn disabled_check_emits_nothing() {
    let mut cfg = config_with(Severity::Error, Vec::new());
    cfg.checks
        .get_mut(ids::CHECK_BUILD_ENTRY_POINTS)
        .expect("policy present")
        .enabled = false;
    let model = workspace(vec![project(
        "packages/app",
        Some(manifest_json(r#"{ "exports": "./src/index.ts" }"#)),
        Vec::new(),
    )]);
    assert!(evaluate(&model, &cfg).findings.is_empty());
}

#[test]
fn fingerprints_distinguish_entries_within_one_manifest() {
    let findings = findings_for(
        r#"{ "exports": { "./a": "./src/a.ts", "./b": "./src/b.ts" } }"#,
        Vec::new(),
    );
    assert_eq!(findings.len(), 2);
    assert_ne!(findings[0].fingerprint, findings[1].fingerprint);
}
