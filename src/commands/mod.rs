//! Command implementations

mod latest;
mod plugins;
mod since;

use std::path::Path;

use log::debug;
use scmpoll::config::PollerConfig;

pub use latest::latest;
pub use plugins::plugins;
pub use since::since;

/// Load the configuration
///
/// An explicit path must exist. Without one, the default path is used when
/// present, otherwise an empty configuration (built-in plugins only).
fn load_config(path: Option<&Path>) -> anyhow::Result<PollerConfig> {
    if let Some(path) = path {
        return Ok(PollerConfig::load(path)?);
    }
    let default = PollerConfig::default_path();
    if default.exists() {
        Ok(PollerConfig::load(&default)?)
    } else {
        debug!("no config at {}, using defaults", default.display());
        Ok(PollerConfig::default())
    }
}
