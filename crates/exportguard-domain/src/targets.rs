//! Build-orchestration target synthesis.
//!
//! Two auxiliary targets make incremental, dependency-aware rebuilds work:
//! a `build-deps` target that fans out to every dependency's `build`, and a
//! continuous `watch-deps` target that re-runs it when dependencies change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A synthesized task-runner target.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    #[serde(rename = "dependsOn", default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Continuous targets keep running instead of completing.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub continuous: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetOptions {
    pub build_deps_target_name: String,
    pub watch_deps_target_name: String,
}

impl Default for TargetOptions {
    fn default() -> Self {
        Self {
            build_deps_target_name: "build-deps".to_string(),
            watch_deps_target_name: "watch-deps".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

/// Shell spelling of the package manager's executor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageManagerCommands {
    pub exec: &'static str,
}

impl PackageManagerCommands {
    pub fn for_package_manager(pm: PackageManager) -> Self {
        let exec = match pm {
            PackageManager::Npm => "npx",
            PackageManager::Pnpm => "pnpm exec",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bunx",
        };
        Self { exec }
    }
}

/// Add the build-deps and watch-deps targets for `project_name`, in place.
///
/// The caller resolves the project name; when no name resolves this function
/// is simply not called (silent no-op upstream).
pub fn synthesize_dependency_targets(
    project_name: &str,
    options: &TargetOptions,
    pm: &PackageManagerCommands,
    targets: &mut BTreeMap<String, TargetSpec>,
) {
    targets.insert(
        options.build_deps_target_name.clone(),
        TargetSpec {
            depends_on: vec!["^build".to_string()],
            continuous: false,
            command: None,
        },
    );

    targets.insert(
        options.watch_deps_target_name.clone(),
        TargetSpec {
            depends_on: vec![options.build_deps_target_name.clone()],
            continuous: true,
            command: Some(format!(
                "{exec} watch --projects {project_name} --include-dependent-projects -- {exec} run {project_name}:{build_deps}",
                exec = pm.exec,
                build_deps = options.build_deps_target_name,
            )),
        },
    );
}
