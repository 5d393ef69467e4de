use crate::{RenderableReport, RenderableSeverity};

/// Render findings as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path},line={line},col={col}::{message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for f in &report.findings {
        let level = match f.severity {
            RenderableSeverity::Error => "error",
            RenderableSeverity::Warning => "warning",
            RenderableSeverity::Info => "notice",
        };

        let mut meta = String::new();
        if let Some(loc) = &f.location {
            meta.push_str(&format!("file={}", loc.path.as_str()));
            if let Some(line) = loc.line {
                meta.push_str(&format!(",line={}", line));
            }
            if let Some(col) = loc.col {
                meta.push_str(&format!(",col={}", col));
            }
        }

        let check_id = f.check_id.as_deref().unwrap_or("exportguard");
        let message = format!("[{}:{}] {}", check_id, f.code, f.message)
            .replace('%', "%25")
            .replace('\r', "%0D")
            .replace('\n', "%0A");

        if meta.is_empty() {
            out.push(format!("::{}::{}", level, message));
        } else {
            out.push(format!("::{} {}::{}", level, meta, message));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RenderableData, RenderableFinding, RenderableLocation, RenderableVerdictStatus};

    #[test]
    fn annotations_carry_file_metadata_and_escape_newlines() {
        let report = RenderableReport {
            verdict: RenderableVerdictStatus::Fail,
            findings: vec![RenderableFinding {
                severity: RenderableSeverity::Error,
                check_id: Some("build.entry_points".to_string()),
                code: "source_root_export".to_string(),
                message: "first line\nsecond line".to_string(),
                location: Some(RenderableLocation {
                    path: "packages/app/package.json".to_string(),
                    line: None,
                    col: None,
                }),
                help: None,
                url: None,
            }],
            data: RenderableData {
                projects_scanned: 1,
                entry_points_scanned: 1,
                findings_emitted: 1,
                findings_total: 1,
                truncated_reason: None,
            },
        };

        let lines = render_github_annotations(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("::error file=packages/app/package.json::"));
        assert!(lines[0].contains("%0A"));
        assert!(lines[0].contains("[build.entry_points:source_root_export]"));
    }
}
