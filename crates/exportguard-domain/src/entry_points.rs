//! Entry-point classification: does a manifest's published surface reference
//! compiled build output or raw workspace sources?

use crate::model::{ExportsEntry, PackageManifest};
use exportguard_types::WorkspacePath;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Extensions that mark a path as workspace source when a project declares no
/// include patterns.
const SOURCE_EXTENSIONS: [&str; 4] = ["ts", "tsx", "cts", "mts"];

/// Export conditions that are typing/documentation aids, never build
/// artifacts. Classification skips them.
const IGNORED_CONDITIONS: [&str; 2] = ["types", "development"];

/// Where in the manifest an offending entry point was declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryPointField {
    /// The `.` export, or a bare `exports` string.
    RootExport,
    /// A subpath export in a map without a `.` key.
    SubpathExport { subpath: String },
    Main,
    Module,
}

/// A single entry point that resolves into workspace source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPointViolation {
    pub field: EntryPointField,
    /// Condition key inside a conditional export mapping, when applicable.
    pub condition: Option<String>,
    /// The declared path, verbatim from the manifest.
    pub path: String,
}

/// Compiled classification context for one project.
///
/// Include patterns, when present, are the authoritative signal for "this is
/// workspace source": a project may legitimately emit `.ts` files as build
/// output, and only the include list can tell those apart.
pub struct EntryPointPolicy {
    project_root: WorkspacePath,
    include: Option<GlobSet>,
}

impl EntryPointPolicy {
    pub fn new(project_root: &WorkspacePath, include: &[String]) -> Self {
        Self {
            project_root: project_root.clone(),
            include: build_include_set(include),
        }
    }

    /// Classify a declared entry-point path as workspace source.
    ///
    /// Resolution: paths starting with `/` are workspace-root-relative (one
    /// leading separator stripped); everything else is project-root-relative.
    pub fn is_source_path(&self, declared: &str) -> bool {
        if let Some(include) = &self.include {
            let resolved = resolve_entry_path(declared, &self.project_root);
            // Paths outside the project root can never match an include
            // pattern anchored to it.
            let Some(candidate) = relative_to_project(&resolved, &self.project_root) else {
                return false;
            };
            return include.is_match(candidate);
        }

        extension(declared)
            .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
            .unwrap_or(false)
    }
}

/// Report whether every reachable entry point references build output.
pub fn is_valid_build_config(manifest: &PackageManifest, policy: &EntryPointPolicy) -> bool {
    classify_entry_points(manifest, policy).is_empty()
}

/// Walk the manifest's reachable entry points and collect every
/// source-referencing one.
///
/// Decision order:
/// 1. no `exports`: `main` and `module` gate validity
/// 2. `exports` string: the string gates validity
/// 3. `exports` map with a `.` key: the root export alone gates validity
/// 4. `exports` map without `.`: every entry gates validity
pub fn classify_entry_points(
    manifest: &PackageManifest,
    policy: &EntryPointPolicy,
) -> Vec<EntryPointViolation> {
    let mut out = Vec::new();

    match &manifest.exports {
        None => {
            if let Some(main) = &manifest.main
                && policy.is_source_path(main)
            {
                out.push(EntryPointViolation {
                    field: EntryPointField::Main,
                    condition: None,
                    path: main.clone(),
                });
            }
            if let Some(module) = &manifest.module
                && policy.is_source_path(module)
            {
                out.push(EntryPointViolation {
                    field: EntryPointField::Module,
                    condition: None,
                    path: module.clone(),
                });
            }
        }
        Some(ExportsEntry::Path(path)) => {
            if policy.is_source_path(path) {
                out.push(EntryPointViolation {
                    field: EntryPointField::RootExport,
                    condition: None,
                    path: path.clone(),
                });
            }
        }
        Some(ExportsEntry::Conditions(map)) => {
            if let Some(root) = map.get(".") {
                // The root export is the canonical public entry point; other
                // keys are not consulted when it exists.
                collect_source_entries(root, EntryPointField::RootExport, policy, &mut out);
            } else {
                for (subpath, entry) in map {
                    collect_source_entries(
                        entry,
                        EntryPointField::SubpathExport {
                            subpath: subpath.clone(),
                        },
                        policy,
                        &mut out,
                    );
                }
            }
        }
        Some(ExportsEntry::Other(_)) => {}
    }

    out
}

/// Count the entry-point path strings the classifier can reach, for report
/// telemetry.
pub fn reachable_entry_points(manifest: &PackageManifest) -> u32 {
    match &manifest.exports {
        None => u32::from(manifest.main.is_some()) + u32::from(manifest.module.is_some()),
        Some(ExportsEntry::Path(_)) => 1,
        Some(ExportsEntry::Conditions(map)) => {
            if let Some(root) = map.get(".") {
                direct_paths(root)
            } else {
                map.values().map(direct_paths).sum()
            }
        }
        Some(ExportsEntry::Other(_)) => 0,
    }
}

/// Exactly one level of conditional nesting is inspected; deeper nesting is
/// not walked. This is a deliberate scope limit of the contract, not an
/// oversight.
fn collect_source_entries(
    entry: &ExportsEntry,
    field: EntryPointField,
    policy: &EntryPointPolicy,
    out: &mut Vec<EntryPointViolation>,
) {
    match entry {
        ExportsEntry::Path(path) => {
            if policy.is_source_path(path) {
                out.push(EntryPointViolation {
                    field,
                    condition: None,
                    path: path.clone(),
                });
            }
        }
        ExportsEntry::Conditions(conditions) => {
            for (condition, value) in conditions {
                if IGNORED_CONDITIONS.contains(&condition.as_str()) {
                    continue;
                }
                if let ExportsEntry::Path(path) = value
                    && policy.is_source_path(path)
                {
                    out.push(EntryPointViolation {
                        field: field.clone(),
                        condition: Some(condition.clone()),
                        path: path.clone(),
                    });
                }
            }
        }
        ExportsEntry::Other(_) => {}
    }
}

fn direct_paths(entry: &ExportsEntry) -> u32 {
    match entry {
        ExportsEntry::Path(_) => 1,
        ExportsEntry::Conditions(conditions) => conditions
            .iter()
            .filter(|(condition, value)| {
                !IGNORED_CONDITIONS.contains(&condition.as_str())
                    && matches!(value, ExportsEntry::Path(_))
            })
            .count() as u32,
        ExportsEntry::Other(_) => 0,
    }
}

/// Resolve a declared entry-point path to a normalized workspace-relative
/// path.
fn resolve_entry_path(declared: &str, project_root: &WorkspacePath) -> WorkspacePath {
    let joined = match declared.strip_prefix('/') {
        // One leading separator stripped: `/dist/index.js` is
        // workspace-root-relative, not filesystem-root-relative.
        Some(stripped) => WorkspacePath::new(stripped),
        None => project_root.join(declared),
    };
    normalize_dot_segments(&joined)
}

/// Collapse `.` and `..` segments; `..` never escapes past the workspace
/// root.
fn normalize_dot_segments(path: &WorkspacePath) -> WorkspacePath {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.as_str().split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        WorkspacePath::new(".")
    } else {
        WorkspacePath::new(segments.join("/"))
    }
}

fn relative_to_project<'a>(
    path: &'a WorkspacePath,
    project_root: &WorkspacePath,
) -> Option<&'a str> {
    if project_root.is_workspace_root() {
        return Some(path.as_str());
    }
    path.as_str()
        .strip_prefix(project_root.as_str())
        .and_then(|rest| rest.strip_prefix('/'))
}

fn build_include_set(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        // Case-sensitive; `*` stays within one path segment, `**` crosses.
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .expect("include patterns must be validated in exportguard-repo");
        builder.add(glob);
    }
    Some(
        builder
            .build()
            .expect("include patterns must be validated in exportguard-repo"),
    )
}

/// Extension of the final path segment. Dotfiles (`.npmrc`) have none.
fn extension(path: &str) -> Option<&str> {
    let file_name = path.rsplit('/').next()?;
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() { None } else { Some(ext) }
}
