//! Pure entry-point policy evaluation for exportguard.
//!
//! No filesystem access in this crate: manifests and include patterns arrive
//! as parsed models (see `exportguard-repo`), findings and verdicts leave as
//! data.

#![forbid(unsafe_code)]

pub mod entry_points;
pub mod model;
pub mod policy;
pub mod report;
pub mod targets;

mod checks;
mod engine;
mod fingerprint;

#[cfg(test)]
mod test_support;

pub use engine::evaluate;
