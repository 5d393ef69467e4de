use crate::{RenderableReport, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Exportguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    out.push_str(&format!("- Verdict: **{}**\n", verdict));
    out.push_str(&format!(
        "- Scanned: {} projects, {} entry points\n",
        report.data.projects_scanned, report.data.entry_points_scanned
    ));
    out.push_str(&format!(
        "- Findings: {} (emitted) / {} (total)\n\n",
        report.data.findings_emitted, report.data.findings_total
    ));

    if let Some(r) = &report.data.truncated_reason {
        out.push_str(&format!("> Note: {}\n\n", r));
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");

    for f in &report.findings {
        let sev = match f.severity {
            RenderableSeverity::Info => "INFO",
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Error => "ERROR",
        };

        let check_id = f.check_id.as_deref().unwrap_or("");
        match &f.location {
            Some(loc) => out.push_str(&format!(
                "- [{}] `{}` / `{}`: {} (`{}`)\n",
                sev, check_id, f.code, f.message, loc.path
            )),
            None => out.push_str(&format!(
                "- [{}] `{}` / `{}`: {}\n",
                sev, check_id, f.code, f.message
            )),
        }

        if let Some(help) = &f.help {
            out.push_str(&format!("  - help: {}\n", help));
        }
        if let Some(url) = &f.url {
            out.push_str(&format!("  - url: {}\n", url));
        }
    }

    out
}
