use exportguard_types::WorkspacePath;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
pub struct WorkspaceModel {
    pub workspace_root: WorkspacePath,

    /// All projects in scope (workspace root + members).
    pub projects: Vec<ProjectModel>,
}

#[derive(Clone, Debug, Default)]
pub struct ProjectModel {
    /// Workspace-relative project directory (`.` for the workspace root).
    pub root: WorkspacePath,

    /// Workspace-relative path of the project's `package.json`.
    pub manifest_path: WorkspacePath,

    /// Parsed manifest; `None` when the project has no `package.json`.
    pub manifest: Option<PackageManifest>,

    /// `include` patterns from the project's TypeScript config, verbatim.
    pub include: Vec<String>,
}

/// The subset of `package.json` that participates in classification.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub exports: Option<ExportsEntry>,
}

/// An `exports` value: a path string, a condition/subpath mapping, or
/// something else entirely (arrays, booleans, null).
///
/// Unrecognized shapes are carried so classification can skip them instead of
/// failing the whole manifest parse.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ExportsEntry {
    Path(String),
    Conditions(BTreeMap<String, ExportsEntry>),
    Other(serde_json::Value),
}

impl ProjectModel {
    pub fn project_name(&self) -> Option<&str> {
        self.manifest.as_ref().and_then(|m| m.name.as_deref())
    }
}
