//! Since command - show revisions after a known one

use std::path::Path;

use chrono::{DateTime, Utc};
use scmpoll::adapters::message::parse_timestamp;
use scmpoll::core::models::{KnownRevision, RevisionData};
use scmpoll::core::services::{MaterialPoller, ScmMaterialPoller};
use scmpoll::output::{OutputMode, PollResult};

use super::load_config;

/// Poll a material for every revision after `revision`
pub fn since(
    config_path: Option<&Path>,
    name: &str,
    revision: &str,
    timestamp: Option<&str>,
    data: RevisionData,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let material_config = config.material(name)?;
    let material = material_config.to_material();
    let working_dir = config.working_dir(material_config)?;

    let timestamp = match timestamp {
        Some(raw) => parse_timestamp(raw)?,
        None => DateTime::<Utc>::UNIX_EPOCH,
    };
    let known = KnownRevision::new(revision, timestamp, data);

    let poller = ScmMaterialPoller::new(config.registry()?);
    let modifications = poller.modifications_since(&material, &working_dir, &known)?;

    PollResult {
        material: name.to_string(),
        plugin_id: material.plugin_id,
        modifications,
    }
    .render(output_mode);
    Ok(())
}
