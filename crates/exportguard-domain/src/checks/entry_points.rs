use crate::checks::utils::{build_allowlist, is_allowed};
use crate::entry_points::{EntryPointField, EntryPointPolicy, classify_entry_points};
use crate::fingerprint::fingerprint_for_entry;
use crate::model::WorkspaceModel;
use crate::policy::EffectiveConfig;
use exportguard_types::{Finding, Location, ids};
use serde_json::json;

pub fn run(model: &WorkspaceModel, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_BUILD_ENTRY_POINTS) else {
        return;
    };
    let allowlist = build_allowlist(&policy.allow);

    for project in &model.projects {
        let Some(manifest) = &project.manifest else {
            continue;
        };
        if is_allowed(allowlist.as_ref(), project.root.as_str()) {
            continue;
        }

        let classifier = EntryPointPolicy::new(&project.root, &project.include);
        for violation in classify_entry_points(manifest, &classifier) {
            let label = entry_label(&violation.field);
            let labelled = match &violation.condition {
                Some(condition) => format!("{label} ({condition})"),
                None => label.clone(),
            };

            out.push(Finding {
                severity: policy.severity,
                check_id: ids::CHECK_BUILD_ENTRY_POINTS.to_string(),
                code: code_for_field(&violation.field).to_string(),
                message: format!(
                    "entry point '{labelled}' references workspace source: {}",
                    violation.path
                ),
                location: Some(Location {
                    path: project.manifest_path.clone(),
                    line: None,
                    col: None,
                }),
                help: Some(
                    "Point published entry points at build output (for example ./dist/...) \
                     or list the path in your tsconfig include patterns only when it really \
                     is source."
                        .to_string(),
                ),
                url: None,
                fingerprint: Some(fingerprint_for_entry(
                    ids::CHECK_BUILD_ENTRY_POINTS,
                    code_for_field(&violation.field),
                    project.manifest_path.as_str(),
                    &label,
                    &violation.path,
                )),
                data: json!({
                    "project": project.project_name(),
                    "field": label,
                    "subpath": subpath_of(&violation.field),
                    "condition": violation.condition,
                    "path": violation.path,
                }),
            });
        }
    }
}

fn entry_label(field: &EntryPointField) -> String {
    match field {
        EntryPointField::RootExport => "exports".to_string(),
        EntryPointField::SubpathExport { subpath } => format!("exports[{subpath}]"),
        EntryPointField::Main => "main".to_string(),
        EntryPointField::Module => "module".to_string(),
    }
}

fn code_for_field(field: &EntryPointField) -> &'static str {
    match field {
        EntryPointField::RootExport => ids::CODE_SOURCE_ROOT_EXPORT,
        EntryPointField::SubpathExport { .. } => ids::CODE_SOURCE_SUBPATH_EXPORT,
        EntryPointField::Main => ids::CODE_SOURCE_MAIN,
        EntryPointField::Module => ids::CODE_SOURCE_MODULE,
    }
}

fn subpath_of(field: &EntryPointField) -> Option<&str> {
    match field {
        EntryPointField::SubpathExport { subpath } => Some(subpath),
        _ => None,
    }
}
