//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after manifest examples.
    pub examples: ExamplePair,
}

/// Before and after manifest examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Manifest that would trigger a finding.
    pub before: &'static str,
    /// Manifest that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    // Try check_id first, then code
    match identifier {
        // Check IDs
        ids::CHECK_BUILD_ENTRY_POINTS => Some(explain_entry_points()),

        // Codes
        ids::CODE_SOURCE_ROOT_EXPORT => Some(explain_source_root_export()),
        ids::CODE_SOURCE_SUBPATH_EXPORT => Some(explain_source_subpath_export()),
        ids::CODE_SOURCE_MAIN => Some(explain_source_main()),
        ids::CODE_SOURCE_MODULE => Some(explain_source_module()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[ids::CHECK_BUILD_ENTRY_POINTS]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_SOURCE_ROOT_EXPORT,
        ids::CODE_SOURCE_SUBPATH_EXPORT,
        ids::CODE_SOURCE_MAIN,
        ids::CODE_SOURCE_MODULE,
    ]
}

// --- Check-level explanations ---

fn explain_entry_points() -> Explanation {
    Explanation {
        title: "Entry Points Must Reference Build Output",
        description: "\
Detects package manifests whose published entry points (`exports`, `main`,
`module`) reference raw workspace sources instead of compiled build output.

Source-referencing entry points are problematic because:
- Consumers resolve uncompiled TypeScript and fail at runtime or bundle time
- Published tarballs ship sources the consumer toolchain cannot execute
- Incremental task runners cannot tell whether a package needs a build step

The root (`.`) export is the canonical public entry point: when it exists it
alone gates the verdict. Subpath exports are consulted only when no root
export is declared. `types` and `development` conditions are documentation
and typing aids, never build artifacts, and are always skipped.

If the project's TypeScript config declares `include` patterns, those are
authoritative: a path is a source path iff it matches one of them. This
matters for projects that legitimately emit `.ts` files as output.",
        remediation: "\
Point every reachable entry point at the project's build output directory:
- Keep `exports`, `main`, and `module` on compiled files (e.g. `./dist/...`)
- Keep `types` conditions on declaration files; they are never flagged
- If the project intentionally ships sources, remove its build target instead",
        examples: ExamplePair {
            before: r#"{
  "name": "@acme/feather",
  "exports": "./src/index.ts"
}"#,
            after: r#"{
  "name": "@acme/feather",
  "exports": "./dist/index.js"
}"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_source_root_export() -> Explanation {
    Explanation {
        title: "Root Export References Source",
        description: "\
The `.` entry of the `exports` map (or the bare `exports` string) points at a
workspace source file. The root export is the canonical entry point module
resolvers pick for bare imports of the package, so shipping a source path here
breaks every consumer that does not compile your sources for you.",
        remediation: "\
Point the root export at compiled output. For conditional exports, fix every
runtime condition (`import`, `require`, `default`); `types` and `development`
entries may keep referencing sources.",
        examples: ExamplePair {
            before: r#"{
  "exports": {
    ".": { "types": "./src/index.d.ts", "default": "./src/index.ts" }
  }
}"#,
            after: r#"{
  "exports": {
    ".": { "types": "./dist/index.d.ts", "default": "./dist/index.js" }
  }
}"#,
        },
    }
}

fn explain_source_subpath_export() -> Explanation {
    Explanation {
        title: "Subpath Export References Source",
        description: "\
A subpath entry of the `exports` map points at a workspace source file, and the
map declares no `.` root export that would otherwise gate the verdict. Without
a root export every subpath is a public entry point in its own right.",
        remediation: "\
Point each subpath export at compiled output, or add a compiled root export if
the subpaths are internal conveniences.",
        examples: ExamplePair {
            before: r#"{
  "exports": { "./utils": "./src/utils.ts" }
}"#,
            after: r#"{
  "exports": { "./utils": "./dist/utils.js" }
}"#,
        },
    }
}

fn explain_source_main() -> Explanation {
    Explanation {
        title: "main References Source",
        description: "\
The manifest has no `exports` field and its `main` field points at a workspace
source file. Without `exports`, `main` is what CommonJS resolvers load.",
        remediation: "Point `main` at the compiled CommonJS entry (e.g. `./dist/index.cjs`).",
        examples: ExamplePair {
            before: r#"{ "main": "./src/index.ts" }"#,
            after: r#"{ "main": "./dist/index.cjs" }"#,
        },
    }
}

fn explain_source_module() -> Explanation {
    Explanation {
        title: "module References Source",
        description: "\
The manifest has no `exports` field and its `module` field points at a
workspace source file. Bundlers prefer `module` for ESM resolution.",
        remediation: "Point `module` at the compiled ESM entry (e.g. `./dist/index.js`).",
        examples: ExamplePair {
            before: r#"{ "module": "./src/index.mts" }"#,
            after: r#"{ "module": "./dist/index.js" }"#,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_covers_every_registered_id() {
        for id in all_check_ids() {
            assert!(lookup_explanation(id).is_some(), "missing explanation: {id}");
        }
        for code in all_codes() {
            assert!(lookup_explanation(code).is_some(), "missing explanation: {code}");
        }
    }

    #[test]
    fn lookup_unknown_returns_none() {
        assert!(lookup_explanation("build.nonsense").is_none());
    }
}
