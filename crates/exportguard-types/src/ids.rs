//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_BUILD_ENTRY_POINTS: &str = "build.entry_points";

// Codes: build.entry_points
pub const CODE_SOURCE_ROOT_EXPORT: &str = "source_root_export";
pub const CODE_SOURCE_SUBPATH_EXPORT: &str = "source_subpath_export";
pub const CODE_SOURCE_MAIN: &str = "source_main";
pub const CODE_SOURCE_MODULE: &str = "source_module";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
