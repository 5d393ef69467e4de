use crate::parse;
use anyhow::Context;
use camino::Utf8Path;
use exportguard_domain::entry_points::{EntryPointPolicy, is_valid_build_config};
use exportguard_types::WorkspacePath;

/// Per-project configuration supplied by the caller.
#[derive(Clone, Debug, Default)]
pub struct ProjectConfig {
    /// TypeScript `include` patterns identifying workspace source.
    pub include: Vec<String>,
}

/// Decide whether a project's published entry points reference build output.
///
/// Returns `Ok(true)` when the project has no `package.json` at all or when
/// every reachable entry point is build output. Unreadable or malformed
/// manifests are hard errors.
pub fn is_valid_package_json_build_config(
    project_config: &ProjectConfig,
    workspace_root: &Utf8Path,
    project_root: &Utf8Path,
) -> anyhow::Result<bool> {
    let manifest_abs = workspace_root.join(project_root).join("package.json");
    if !manifest_abs.exists() {
        // Nothing published, nothing to misconfigure.
        return Ok(true);
    }

    let text =
        std::fs::read_to_string(&manifest_abs).with_context(|| format!("read {}", manifest_abs))?;
    let manifest = parse::parse_package_manifest(manifest_abs.as_str(), &text)?;

    parse::validate_include_globs(&project_config.include)?;

    let relative_root = relative_project_root(workspace_root, project_root);
    let policy = EntryPointPolicy::new(&relative_root, &project_config.include);
    Ok(is_valid_build_config(&manifest, &policy))
}

/// Normalize `project_root` to a workspace-relative path (`.` for the root).
pub fn relative_project_root(workspace_root: &Utf8Path, project_root: &Utf8Path) -> WorkspacePath {
    if let Ok(stripped) = project_root.strip_prefix(workspace_root) {
        return WorkspacePath::from(stripped);
    }
    WorkspacePath::from(project_root)
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
    fn missing_manifest_is_valid() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        std::fs::create_dir_all(root.join("packages/empty")).expect("mkdir");

        let valid = is_valid_package_json_build_config(
            &ProjectConfig::default(),
            &root,
            Utf8Path::new("packages/empty"),
        )
        .expect("classify");
        assert!(valid);
    }

    #[test]
    fn source_entry_point_is_invalid() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(
            &root.join("packages/app/package.json"),
            r#"{ "name": "app", "exports": "./src/index.ts" }"#,
        );

        let valid = is_valid_package_json_build_config(
            &ProjectConfig::default(),
            &root,
            Utf8Path::new("packages/app"),
        )
        .expect("classify");
        assert!(!valid);
    }

    #[test]
    fn build_output_entry_point_is_valid() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(
            &root.join("packages/lib/package.json"),
            r#"{ "name": "lib", "main": "./dist/index.js", "exports": { ".": { "import": "./dist/index.js" } } }"#,
        );

        let valid = is_valid_package_json_build_config(
            &ProjectConfig::default(),
            &root,
            Utf8Path::new("packages/lib"),
        )
        .expect("classify");
        assert!(valid);
    }

    #[test]
    fn include_patterns_steer_the_decision() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(
            &root.join("packages/gen/package.json"),
            r#"{ "name": "gen", "exports": "./dist/index.ts" }"#,
        );

        // Extension inspection alone would flag the .ts entry.
        let flagged = is_valid_package_json_build_config(
            &ProjectConfig::default(),
            &root,
            Utf8Path::new("packages/gen"),
        )
        .expect("classify");
        assert!(!flagged);

        // An include list scoped to src/ clears the generated .ts artifact.
        let cleared = is_valid_package_json_build_config(
            &ProjectConfig {
                include: vec!["src/**/*.ts".to_string()],
            },
            &root,
            Utf8Path::new("packages/gen"),
        )
        .expect("classify");
        assert!(cleared);
    }

    #[test]
    fn workspace_root_relative_entry_path_resolves() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(
            &root.join("packages/app/package.json"),
            r#"{ "name": "app", "main": "/packages/app/src/index.ts" }"#,
        );

        let valid = is_valid_package_json_build_config(
            &ProjectConfig::default(),
            &root,
            Utf8Path::new("packages/app"),
        )
        .expect("classify");
        assert!(!valid);
    }

    #[test]
    fn repeated_calls_with_unchanged_inputs_agree() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(
            &root.join("packages/app/package.json"),
            r#"{ "name": "app", "exports": "./src/index.ts" }"#,
        );

        let config = ProjectConfig::default();
        let first =
            is_valid_package_json_build_config(&config, &root, Utf8Path::new("packages/app"))
                .expect("classify");
        let second =
            is_valid_package_json_build_config(&config, &root, Utf8Path::new("packages/app"))
                .expect("classify");
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_manifest_propagates_an_error() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(&root.join("packages/bad/package.json"), "{ nope");

        let err = is_valid_package_json_build_config(
            &ProjectConfig::default(),
            &root,
            Utf8Path::new("packages/bad"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("package.json"));
    }

    #[test]
    fn absolute_project_root_is_relativized() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        let rel = relative_project_root(&root, &root.join("packages/a"));
        assert_eq!(rel.as_str(), "packages/a");

        let rel = relative_project_root(&root, &root);
        assert!(rel.is_workspace_root());
    }
}
