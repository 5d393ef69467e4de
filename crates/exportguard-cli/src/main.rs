//! CLI entry point for exportguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `exportguard-app` crate.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use exportguard_app::{
    CheckInput, ExplainOutput, TargetsInput, empty_report, parse_report_json, render_annotations,
    render_markdown, run_check, run_explain, run_targets, runtime_error_report, serialize_report,
    to_renderable, verdict_exit_code,
};
use exportguard_settings::Overrides;
use exportguard_types::ExportguardReport;

#[derive(Parser, Debug)]
#[command(
    name = "exportguard",
    version,
    about = "Entry-point hygiene guard for JavaScript and TypeScript monorepos"
)]
struct Cli {
    /// Workspace root (directory containing the root package.json).
    #[arg(long, default_value = ".")]
    workspace_root: Utf8PathBuf,

    /// Path to exportguard config TOML.
    #[arg(long, default_value = "exportguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|warn|compat).
    #[arg(long)]
    profile: Option<String>,

    /// Override maximum findings to emit.
    #[arg(long)]
    max_findings: Option<u32>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate entry-point policy and write artifacts.
    Check {
        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/exportguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/exportguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/exportguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/exportguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit (default 10, per GHA best practices).
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Synthesize build-deps/watch-deps targets for a project as JSON.
    Targets {
        /// Workspace-relative project directory.
        #[arg(long)]
        project: Utf8PathBuf,

        /// Package manager for synthesized commands (npm|pnpm|yarn|bun).
        /// Detected from the lockfile when omitted.
        #[arg(long)]
        package_manager: Option<String>,

        /// Where to write the targets JSON (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g., "build.entry_points") or code (e.g., "source_main") to explain.
        identifier: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Check {
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_check(&cli, report_out.clone(), write_markdown, markdown_out.clone()),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Annotations { report, max } => cmd_annotations(report, max),
        Commands::Targets {
            ref project,
            ref package_manager,
            ref output,
        } => cmd_targets(&cli, project, package_manager.clone(), output.clone()),
        Commands::Explain { identifier } => cmd_explain(&identifier),
    }
}

fn cmd_check(
    cli: &Cli,
    report_out: Utf8PathBuf,
    write_markdown: bool,
    markdown_out: Utf8PathBuf,
) -> anyhow::Result<()> {
    let workspace_root = cli
        .workspace_root
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.workspace_root.clone());

    let result = (|| -> anyhow::Result<i32> {
        if !workspace_root.exists() {
            anyhow::bail!("workspace root does not exist: {}", workspace_root);
        }
        // Load config if present; missing file is allowed (defaults apply).
        let cfg_path = workspace_root.join(&cli.config);
        let cfg_text = std::fs::read_to_string(&cfg_path).unwrap_or_default();

        let overrides = Overrides {
            profile: cli.profile.clone(),
            max_findings: cli.max_findings,
            package_manager: None,
        };

        // Fast path: missing root package.json -> emit empty report.
        if !exportguard_repo::root_manifest_exists(&workspace_root) {
            let cfg = if cfg_text.trim().is_empty() {
                exportguard_settings::ExportguardConfigV1::default()
            } else {
                exportguard_settings::parse_config_toml(&cfg_text).context("parse config")?
            };
            let resolved = exportguard_settings::resolve_config(cfg, overrides)
                .context("resolve config")?;
            let report = empty_report(&resolved.effective.profile);
            write_report_file(&report_out, &report).context("write report json")?;
            if write_markdown {
                let md = render_markdown(&to_renderable(&report));
                write_text_file(&markdown_out, &md).context("write markdown")?;
            }
            eprintln!(
                "exportguard: no package.json found at {}; emitting empty report",
                workspace_root.join("package.json")
            );
            return Ok(0);
        }

        let output = run_check(CheckInput {
            workspace_root: &workspace_root,
            config_text: &cfg_text,
            overrides,
        })?;

        write_report_file(&report_out, &output.report).context("write report json")?;

        if write_markdown {
            let md = render_markdown(&to_renderable(&output.report));
            write_text_file(&markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            let _ = write_report_file(&report_out, &report);
            eprintln!("exportguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(path: &camino::Utf8Path, report: &ExportguardReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    let data = serialize_report(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn write_text_file(path: &camino::Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_text_file(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_annotations(report_path: Utf8PathBuf, max: usize) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let annotations = render_annotations(&to_renderable(&report), max);

    for annotation in annotations {
        println!("{}", annotation);
    }

    Ok(())
}

fn cmd_targets(
    cli: &Cli,
    project: &camino::Utf8Path,
    package_manager: Option<String>,
    output: Option<Utf8PathBuf>,
) -> anyhow::Result<()> {
    let workspace_root = cli
        .workspace_root
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.workspace_root.clone());

    let cfg_path = workspace_root.join(&cli.config);
    let cfg_text = std::fs::read_to_string(&cfg_path).unwrap_or_default();

    let result = run_targets(TargetsInput {
        workspace_root: &workspace_root,
        project_root: project,
        config_text: &cfg_text,
        overrides: Overrides {
            profile: cli.profile.clone(),
            max_findings: cli.max_findings,
            package_manager,
        },
    })?;

    let json =
        serde_json::to_string_pretty(&result.targets).context("serialize targets json")?;
    if let Some(out_path) = output {
        write_text_file(&out_path, &json).context("write targets output")?;
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", exportguard_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                exportguard_app::format_not_found(&identifier, available_check_ids, available_codes)
            );
            std::process::exit(1);
        }
    }
}
