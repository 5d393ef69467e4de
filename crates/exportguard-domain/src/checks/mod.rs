use crate::model::WorkspaceModel;
use crate::policy::EffectiveConfig;
use exportguard_types::Finding;

mod entry_points;
mod utils;

#[cfg(test)]
mod tests;

pub fn run_all(model: &WorkspaceModel, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    entry_points::run(model, cfg, out);
}
