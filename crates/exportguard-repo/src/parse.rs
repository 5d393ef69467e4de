use anyhow::Context;
use camino::Utf8Path;
use exportguard_domain::model::PackageManifest;
use globset::GlobBuilder;
use serde::Deserialize;

/// Parse `package.json` text into the classification model.
///
/// Unknown fields are ignored; malformed JSON is a hard error so a broken
/// manifest never passes silently.
pub fn parse_package_manifest(manifest_path: &str, text: &str) -> anyhow::Result<PackageManifest> {
    serde_json::from_str(text).with_context(|| format!("parse {manifest_path}"))
}

#[derive(Debug, Default, Deserialize)]
struct TsConfig {
    #[serde(default)]
    include: Vec<String>,
}

/// Read the `include` patterns from a project's `tsconfig.json`, if present.
///
/// Comments and trailing commas (JSONC) are not accepted; such configs fail
/// the run rather than being half-read.
pub fn read_ts_include(project_dir: &Utf8Path) -> anyhow::Result<Vec<String>> {
    let tsconfig = project_dir.join("tsconfig.json");
    if !tsconfig.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(&tsconfig).with_context(|| format!("read {}", tsconfig))?;
    let parsed: TsConfig =
        serde_json::from_str(&text).with_context(|| format!("parse {}", tsconfig))?;
    Ok(parsed.include)
}

/// Compile-check include patterns up front so downstream matching can assume
/// they are valid.
pub fn validate_include_globs(patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid include pattern '{pattern}'"))?;
    }
    Ok(())
}
