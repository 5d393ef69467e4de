//! The `targets` use case: synthesize dependency-aware build/watch targets
//! for one project.

use anyhow::Context;
use camino::Utf8Path;
use exportguard_domain::targets::{PackageManager, PackageManagerCommands, TargetSpec};
use exportguard_settings::{Overrides, ResolvedConfig};
use std::collections::BTreeMap;

/// Input for the targets use case.
#[derive(Clone, Debug)]
pub struct TargetsInput<'a> {
    pub workspace_root: &'a Utf8Path,
    /// Workspace-relative project directory.
    pub project_root: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the targets use case.
#[derive(Clone, Debug)]
pub struct TargetsOutput {
    pub targets: BTreeMap<String, TargetSpec>,
    pub package_manager: PackageManager,
    pub resolved_config: ResolvedConfig,
}

/// Synthesize targets for the project. An empty map means the project has no
/// resolvable name and was deliberately skipped.
pub fn run_targets(input: TargetsInput<'_>) -> anyhow::Result<TargetsOutput> {
    let cfg = if input.config_text.trim().is_empty() {
        exportguard_settings::ExportguardConfigV1::default()
    } else {
        exportguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved = exportguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let package_manager = resolved
        .package_manager
        .unwrap_or_else(|| exportguard_repo::detect_package_manager(input.workspace_root));
    let pm = PackageManagerCommands::for_package_manager(package_manager);

    let mut targets = BTreeMap::new();
    exportguard_repo::add_build_and_watch_deps_targets(
        input.workspace_root,
        input.project_root,
        &mut targets,
        &resolved.targets,
        &pm,
    )
    .context("synthesize targets")?;

    Ok(TargetsOutput {
        targets,
        package_manager,
        resolved_config: resolved,
    })
}
