use crate::{model::ExportguardConfigV1, presets};
use anyhow::Context;
use exportguard_domain::policy::{CheckPolicy, EffectiveConfig, FailOn};
use exportguard_domain::targets::{PackageManager, TargetOptions};
use exportguard_types::Severity;
use globset::Glob;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub max_findings: Option<u32>,
    pub package_manager: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    pub targets: TargetOptions,
    /// `None` means "detect from the lockfile".
    pub package_manager: Option<PackageManager>,
}

pub fn resolve_config(
    cfg: ExportguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile);

    // max findings
    if let Some(mf) = overrides.max_findings.or(cfg.max_findings) {
        effective.max_findings = mf as usize;
    }

    // per-check overrides
    for (check_id, cc) in cfg.checks.iter() {
        let entry = effective
            .checks
            .entry(check_id.clone())
            .or_insert_with(CheckPolicy::disabled);

        if let Some(enabled) = cc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = cc.severity.as_deref() {
            entry.severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {check_id}"))?;
        }
        if !cc.allow.is_empty() {
            validate_allowlist(check_id, &cc.allow)?;
            entry.allow = cc.allow.clone();
        }
    }

    // fail_on override from config
    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    let mut targets = TargetOptions::default();
    if let Some(tc) = &cfg.targets {
        if let Some(name) = &tc.build_deps_target_name {
            targets.build_deps_target_name = name.clone();
        }
        if let Some(name) = &tc.watch_deps_target_name {
            targets.watch_deps_target_name = name.clone();
        }
    }

    let package_manager = overrides
        .package_manager
        .as_deref()
        .or(cfg.package_manager.as_deref())
        .map(parse_package_manager)
        .transpose()?;

    Ok(ResolvedConfig {
        effective,
        targets,
        package_manager,
    })
}

fn validate_allowlist(check_id: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid allow glob for {check_id}: {pattern}"))?;
    }
    Ok(())
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}

fn parse_package_manager(v: &str) -> anyhow::Result<PackageManager> {
    match v {
        "npm" => Ok(PackageManager::Npm),
        "pnpm" => Ok(PackageManager::Pnpm),
        "yarn" => Ok(PackageManager::Yarn),
        "bun" => Ok(PackageManager::Bun),
        other => anyhow::bail!("unknown package_manager: {other} (expected npm|pnpm|yarn|bun)"),
    }
}
