//! Shared fixtures for unit tests in this crate.

use crate::model::{PackageManifest, ProjectModel};
use crate::policy::{CheckPolicy, EffectiveConfig, FailOn};
use exportguard_types::{Severity, WorkspacePath, ids};
use std::collections::BTreeMap;

pub fn manifest_json(json: &str) -> PackageManifest {
    serde_json::from_str(json).expect("fixture manifest must parse")
}

pub fn project(root: &str, manifest: Option<PackageManifest>, include: Vec<String>) -> ProjectModel {
    let root = WorkspacePath::new(root);
    let manifest_path = root.join("package.json");
    ProjectModel {
        root,
        manifest_path,
        manifest,
        include,
    }
}

pub fn config_with(severity: Severity, allow: Vec<String>) -> EffectiveConfig {
    let mut checks = BTreeMap::new();
    checks.insert(
        ids::CHECK_BUILD_ENTRY_POINTS.to_string(),
        CheckPolicy {
            enabled: true,
            severity,
            allow,
        },
    );
    EffectiveConfig {
        profile: "test".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        checks,
    }
}
