use anyhow::Context;
use camino::Utf8Path;
use exportguard_domain::targets::{
    PackageManagerCommands, TargetOptions, TargetSpec, synthesize_dependency_targets,
};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Deserialize)]
struct ProjectJson {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NamedManifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    nx: Option<NxSection>,
}

#[derive(Debug, Default, Deserialize)]
struct NxSection {
    #[serde(default)]
    name: Option<String>,
}

impl NamedManifest {
    /// A task-runner `nx.name` overrides the published package name.
    fn project_name(self) -> Option<String> {
        self.nx.and_then(|nx| nx.name).or(self.name)
    }
}

/// Synthesize the build-deps and watch-deps targets for the project at
/// `project_root`.
///
/// The project name comes from `project.json` when it declares one, falling
/// back to the `package.json` `nx.name`, then its `name`. A project with none
/// of these is left alone; anonymous projects cannot be addressed by the task
/// runner, so there is nothing useful to synthesize.
pub fn add_build_and_watch_deps_targets(
    workspace_root: &Utf8Path,
    project_root: &Utf8Path,
    targets: &mut BTreeMap<String, TargetSpec>,
    options: &TargetOptions,
    pm: &PackageManagerCommands,
) -> anyhow::Result<()> {
    let Some(project_name) = resolve_project_name(workspace_root, project_root)? else {
        return Ok(());
    };

    synthesize_dependency_targets(&project_name, options, pm, targets);
    Ok(())
}

fn resolve_project_name(
    workspace_root: &Utf8Path,
    project_root: &Utf8Path,
) -> anyhow::Result<Option<String>> {
    let dir = workspace_root.join(project_root);

    let project_json = dir.join("project.json");
    if project_json.exists() {
        let text = std::fs::read_to_string(&project_json)
            .with_context(|| format!("read {}", project_json))?;
        let parsed: ProjectJson =
            serde_json::from_str(&text).with_context(|| format!("parse {}", project_json))?;
        if parsed.name.is_some() {
            return Ok(parsed.name);
        }
    }

    let package_json = dir.join("package.json");
    if package_json.exists() {
        let text = std::fs::read_to_string(&package_json)
            .with_context(|| format!("read {}", package_json))?;
        let parsed: NamedManifest =
            serde_json::from_str(&text).with_context(|| format!("parse {}", package_json))?;
        return Ok(parsed.project_name());
    }

    Ok(None)
}
