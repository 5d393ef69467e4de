//! Repository adapters: discover workspace projects, read and parse
//! `package.json` and `tsconfig.json`.
//!
//! This crate is allowed to do filesystem IO. It never spawns external
//! processes; everything is derived from files under the workspace root.

#![forbid(unsafe_code)]

mod classify;
mod discover;
mod package_manager;
mod parse;
mod targets;

use anyhow::Context;
use camino::Utf8Path;
use exportguard_domain::model::{ProjectModel, WorkspaceModel};
use exportguard_types::WorkspacePath;

pub use classify::{ProjectConfig, is_valid_package_json_build_config, relative_project_root};
pub use discover::discover_projects;
pub use package_manager::detect_package_manager;
pub use targets::add_build_and_watch_deps_targets;

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse arbitrary text as a `package.json` manifest.
    ///
    /// Returns `Ok(...)` on JSON that deserializes into the manifest model,
    /// `Err(...)` otherwise. **Never panics** on any input.
    pub fn parse_manifest(text: &str) -> anyhow::Result<()> {
        let _ = parse::parse_package_manifest("package.json", text)?;
        Ok(())
    }

    /// Expand workspace member glob patterns against a list of candidate paths.
    ///
    /// Compiles patterns with the same segment-local `*` semantics the
    /// discovery walk uses. Returns `Ok(matched_paths)` when every pattern is
    /// valid, `Err(...)` otherwise. **Never panics** on any input.
    pub fn expand_workspace_globs(
        patterns: &[String],
        candidates: &[String],
    ) -> anyhow::Result<Vec<String>> {
        let set = discover::build_globset(patterns)?;
        Ok(candidates
            .iter()
            .filter(|c| set.is_match(c))
            .cloned()
            .collect())
    }
}

/// True when the workspace root has a `package.json` to analyze.
pub fn root_manifest_exists(workspace_root: &Utf8Path) -> bool {
    workspace_root.join("package.json").exists()
}

/// Build the in-memory workspace model used by the policy engine.
///
/// `workspace_root` is the directory containing the root `package.json`.
/// Manifests are re-read on every call; results are never cached across runs.
pub fn build_workspace_model(workspace_root: &Utf8Path) -> anyhow::Result<WorkspaceModel> {
    let roots = discover::discover_projects(workspace_root).context("discover projects")?;

    let mut model = WorkspaceModel {
        workspace_root: WorkspacePath::from(workspace_root),
        projects: Vec::with_capacity(roots.len()),
    };

    for root in roots {
        let dir = if root.is_workspace_root() {
            workspace_root.to_path_buf()
        } else {
            workspace_root.join(root.as_str())
        };

        let manifest_path = root.join("package.json");
        let manifest_abs = dir.join("package.json");
        let manifest = if manifest_abs.exists() {
            let text = std::fs::read_to_string(&manifest_abs)
                .with_context(|| format!("read {}", manifest_abs))?;
            Some(parse::parse_package_manifest(manifest_path.as_str(), &text)?)
        } else {
            None
        };

        let include = parse::read_ts_include(&dir)
            .with_context(|| format!("read tsconfig for {}", root.as_str()))?;
        parse::validate_include_globs(&include)
            .with_context(|| format!("tsconfig include for {}", root.as_str()))?;

        model.projects.push(ProjectModel {
            root,
            manifest_path,
            manifest,
            include,
        });
    }

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn write_file(path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write file");
    }

    #[test]
    fn model_includes_root_and_members_with_their_includes() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(
            &root.join("package.json"),
            r#"{ "name": "workspace", "workspaces": ["packages/*"] }"#,
        );
        write_file(
            &root.join("packages/lib/package.json"),
            r#"{ "name": "lib", "exports": "./dist/index.js" }"#,
        );
        write_file(
            &root.join("packages/lib/tsconfig.json"),
            r#"{ "include": ["src/**/*.ts"] }"#,
        );

        let model = build_workspace_model(&root).expect("build model");
        assert_eq!(model.projects.len(), 2);

        let lib = model
            .projects
            .iter()
            .find(|p| p.root.as_str() == "packages/lib")
            .expect("lib project");
        assert_eq!(lib.manifest_path.as_str(), "packages/lib/package.json");
        assert_eq!(lib.include, vec!["src/**/*.ts"]);
        assert_eq!(lib.project_name(), Some("lib"));
    }

    #[test]
    fn member_without_manifest_is_kept_with_none() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(
            &root.join("package.json"),
            r#"{ "workspaces": ["packages/*"] }"#,
        );
        write_file(&root.join("packages/docs/package.json"), r#"{ "name": "docs" }"#);

        let model = build_workspace_model(&root).expect("build model");
        let names: Vec<_> = model.projects.iter().map(|p| p.root.as_str()).collect();
        assert_eq!(names, vec![".", "packages/docs"]);

        let ws = &model.projects[0];
        assert!(ws.manifest.is_some());
    }

    #[test]
    fn malformed_member_manifest_fails_the_build() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(
            &root.join("package.json"),
            r#"{ "workspaces": ["packages/*"] }"#,
        );
        write_file(&root.join("packages/bad/package.json"), "{ nope");

        let err = build_workspace_model(&root).unwrap_err();
        assert!(err.to_string().contains("packages/bad/package.json"));
    }

    #[test]
    fn invalid_tsconfig_include_fails_the_build() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(
            &root.join("package.json"),
            r#"{ "workspaces": ["packages/*"] }"#,
        );
        write_file(
            &root.join("packages/a/package.json"),
            r#"{ "name": "a" }"#,
        );
        write_file(
            &root.join("packages/a/tsconfig.json"),
            r#"{ "include": ["src/["] }"#,
        );

        let err = build_workspace_model(&root).unwrap_err();
        assert!(err.to_string().contains("packages/a"));
    }
}
