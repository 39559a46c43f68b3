//! Latest command - show the newest revision of a material

use std::path::Path;

use scmpoll::core::services::{MaterialPoller, ScmMaterialPoller};
use scmpoll::output::{OutputMode, PollResult};

use super::load_config;

/// Poll a material for its latest revision
pub fn latest(
    config_path: Option<&Path>,
    name: &str,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let material_config = config.material(name)?;
    let material = material_config.to_material();
    let working_dir = config.working_dir(material_config)?;

    let poller = ScmMaterialPoller::new(config.registry()?);
    let modifications = poller.latest_modification(&material, &working_dir)?;

    PollResult {
        material: name.to_string(),
        plugin_id: material.plugin_id,
        modifications,
    }
    .render(output_mode);
    Ok(())
}
