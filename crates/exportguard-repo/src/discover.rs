use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use exportguard_types::WorkspacePath;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::path::PathBuf;
use walkdir::WalkDir;

/// `workspaces` in a root `package.json`: either a bare pattern array or the
/// yarn object form with a `packages` key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkspacesField {
    Patterns(Vec<String>),
    Detailed {
        #[serde(default)]
        packages: Vec<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
struct RootManifest {
    #[serde(default)]
    workspaces: Option<WorkspacesField>,
}

/// Discover project roots for the workspace rooted at `workspace_root`.
///
/// Behavior:
/// - The workspace root itself is always a project.
/// - If the root `package.json` declares `workspaces`, expand the patterns
///   against directories that contain a `package.json`.
/// - `node_modules` and dot-directories are never descended into.
pub fn discover_projects(workspace_root: &Utf8Path) -> anyhow::Result<Vec<WorkspacePath>> {
    let root_manifest = workspace_root.join("package.json");
    let text = std::fs::read_to_string(&root_manifest)
        .with_context(|| format!("read {}", root_manifest))?;
    let manifest: RootManifest =
        serde_json::from_str(&text).with_context(|| format!("parse {}", root_manifest))?;

    let patterns = match manifest.workspaces {
        Some(WorkspacesField::Patterns(p)) => p,
        Some(WorkspacesField::Detailed { packages }) => packages,
        None => Vec::new(),
    };

    let mut out: Vec<WorkspacePath> = vec![WorkspacePath::new(".")];

    if patterns.is_empty() {
        return Ok(out);
    }

    let member_set = build_globset(&patterns).context("compile workspaces globset")?;

    for abs in WalkDir::new(workspace_root)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == "package.json")
        .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
    {
        let rel = abs
            .strip_prefix(workspace_root)
            .unwrap_or(&abs)
            .as_str()
            .replace('\\', "/");
        if rel == "package.json" {
            continue;
        }

        let Some(dir_rel) = Utf8Path::new(&rel).parent().map(|p| p.as_str()) else {
            continue;
        };
        if member_set.is_match(dir_rel) {
            out.push(WorkspacePath::new(dir_rel));
        }
    }

    // Stable order.
    out.sort();
    out.dedup();

    Ok(out)
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    // Depth 0 is the workspace root itself, whatever it is named.
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == "node_modules" || name.starts_with('.')
}

pub(crate) fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        // npm workspace globs keep `*` within one path segment.
        b.add(GlobBuilder::new(p).literal_separator(true).build()?);
    }
    Ok(b.build()?)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
