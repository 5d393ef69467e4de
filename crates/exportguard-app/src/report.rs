use anyhow::Context;
use exportguard_render::{
    RenderableData, RenderableFinding, RenderableLocation, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};
use exportguard_types::{
    ExportguardData, ExportguardReport, Finding, SCHEMA_REPORT_V1, Severity, ToolMeta, Verdict,
    ids,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<ExportguardReport> {
    let report: ExportguardReport = serde_json::from_str(text).context("parse report json")?;
    if report.schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {}", report.schema);
    }
    Ok(report)
}

pub fn serialize_report(report: &ExportguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &ExportguardReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        findings: report.findings.iter().map(renderable_finding).collect(),
        data: RenderableData {
            projects_scanned: report.data.projects_scanned,
            entry_points_scanned: report.data.entry_points_scanned,
            findings_emitted: report.data.findings_emitted,
            findings_total: report.data.findings_total,
            truncated_reason: report.data.truncated_reason.clone(),
        },
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    RenderableFinding {
        severity: match f.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        check_id: Some(f.check_id.clone()),
        code: f.code.clone(),
        message: f.message.clone(),
        location: f.location.as_ref().map(|loc| RenderableLocation {
            path: loc.path.as_str().to_string(),
            line: loc.line,
            col: loc.col,
        }),
        help: f.help.clone(),
        url: f.url.clone(),
    }
}

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "exportguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// A passing report for a workspace with nothing to analyze.
pub fn empty_report(profile: &str) -> ExportguardReport {
    let now = OffsetDateTime::now_utc();
    ExportguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at: now,
        finished_at: now,
        verdict: Verdict::Pass,
        findings: Vec::new(),
        data: ExportguardData {
            profile: profile.to_string(),
            projects_scanned: 0,
            entry_points_scanned: 0,
            findings_total: 0,
            findings_emitted: 0,
            truncated_reason: None,
        },
    }
}

/// A failing report carrying a single tool-level error finding.
///
/// Written when the run itself breaks, so downstream consumers still get a
/// machine-readable artifact.
pub fn runtime_error_report(message: &str) -> ExportguardReport {
    let now = OffsetDateTime::now_utc();
    ExportguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        findings: vec![Finding {
            severity: Severity::Error,
            check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
            location: None,
            help: Some("Fix the tool error and re-run exportguard.".to_string()),
            url: None,
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        data: ExportguardData {
            profile: "unknown".to_string(),
            projects_scanned: 0,
            entry_points_scanned: 0,
            findings_total: 1,
            findings_emitted: 1,
            truncated_reason: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_round_trips_through_json() {
        let report = runtime_error_report("boom");
        let bytes = serialize_report(&report).expect("serialize");
        let parsed = parse_report_json(std::str::from_utf8(&bytes).expect("utf8"))
            .expect("parse");
        assert_eq!(parsed.verdict, Verdict::Fail);
        assert_eq!(parsed.findings[0].code, ids::CODE_RUNTIME_ERROR);
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let err = parse_report_json(r#"{ "schema": "other.v9", "tool": { "name": "x", "version": "0" }, "started_at": "2026-01-01T00:00:00Z", "finished_at": "2026-01-01T00:00:00Z", "verdict": "pass", "findings": [], "data": { "profile": "strict", "projects_scanned": 0, "entry_points_scanned": 0, "findings_total": 0, "findings_emitted": 0 } }"#).unwrap_err();
        assert!(err.to_string().contains("unknown report schema"));
    }

    #[test]
    fn renderable_carries_scan_counters() {
        let mut report = empty_report("strict");
        report.data.projects_scanned = 4;
        report.data.entry_points_scanned = 9;
        let renderable = to_renderable(&report);
        assert_eq!(renderable.data.projects_scanned, 4);
        assert_eq!(renderable.data.entry_points_scanned, 9);
        assert_eq!(renderable.verdict, RenderableVerdictStatus::Pass);
    }
}
