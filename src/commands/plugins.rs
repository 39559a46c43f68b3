//! Plugins command - list registered plugin ids

use std::path::Path;

use scmpoll::output::{OutputMode, PluginListResult};

use super::load_config;

/// List every plugin materials can refer to
pub fn plugins(config_path: Option<&Path>, output_mode: OutputMode) -> anyhow::Result<()> {
    let registry = load_config(config_path)?.registry()?;
    PluginListResult {
        plugins: registry.plugin_ids().into_iter().map(String::from).collect(),
    }
    .render(output_mode);
    Ok(())
}
