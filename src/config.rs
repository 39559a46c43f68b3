//! Poller configuration
//!
//! Declares the materials to poll and the external plugins that serve them.
//! Config is stored at `~/.config/scmpoll/config.toml` (XDG standard) unless
//! a path is given explicitly.
//!
//! ```toml
//! work_dir = "/var/lib/scmpoll"
//!
//! [[plugins]]
//! id = "example.scm"
//! command = "/usr/local/bin/example-scm"
//!
//! [[materials]]
//! name = "app"
//! plugin_id = "git"
//! [materials.configuration]
//! url = "https://example/repo"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::{GitPlugin, ProcessPlugin, git};
use crate::core::models::Material;
use crate::core::ports::ExtensionError;
use crate::core::services::ExtensionRegistry;

const APP_DIR: &str = "scmpoll";
const CONFIG_FILE: &str = "config.toml";

/// Errors loading or using the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("cannot parse config {}: {source}", path.display())]
    Parse {
        /// Config file path
        path: PathBuf,
        /// TOML error
        source: toml::de::Error,
    },

    /// No material with this name is configured
    #[error("no material named '{0}' in config")]
    UnknownMaterial(String),

    /// Working directory could not be prepared
    #[error("cannot prepare working directory {}: {source}", path.display())]
    WorkingDir {
        /// Directory path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Root for per-material working directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,

    /// External plugins
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,

    /// Materials to poll
    #[serde(default)]
    pub materials: Vec<MaterialConfig>,
}

/// An external executable plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Plugin id materials refer to
    pub id: String,

    /// Program to run
    pub command: PathBuf,

    /// Leading arguments, before the request name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

/// A named material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialConfig {
    /// Name used on the command line
    pub name: String,

    /// Plugin that implements this material
    pub plugin_id: String,

    /// Plugin-specific settings
    #[serde(default)]
    pub configuration: BTreeMap<String, String>,
}

impl MaterialConfig {
    /// Build the domain material
    #[must_use]
    pub fn to_material(&self) -> Material {
        self.configuration
            .iter()
            .fold(Material::new(self.plugin_id.clone()), |m, (k, v)| m.with_property(k, v))
    }
}

impl PollerConfig {
    /// Default config file path
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR).join(CONFIG_FILE)
    }

    /// Load config from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Look up a material by name
    pub fn material(&self, name: &str) -> Result<&MaterialConfig, ConfigError> {
        self.materials
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| ConfigError::UnknownMaterial(name.to_string()))
    }

    /// Build the plugin registry: built-in git plus every configured plugin
    pub fn registry(&self) -> Result<ExtensionRegistry, ExtensionError> {
        let mut registry = ExtensionRegistry::new();
        registry.register(git::PLUGIN_ID, Arc::new(GitPlugin::new()))?;
        for plugin in &self.plugins {
            registry.register(
                plugin.id.clone(),
                Arc::new(ProcessPlugin::new(plugin.command.clone(), plugin.args.clone())),
            )?;
        }
        Ok(registry)
    }

    /// Root for working directories
    #[must_use]
    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
        })
    }

    /// Absolute working directory for a material, created if missing
    pub fn working_dir(&self, material: &MaterialConfig) -> Result<PathBuf, ConfigError> {
        let dir = self.work_dir().join(&material.name);
        let wrap = |source| ConfigError::WorkingDir {
            path: dir.clone(),
            source,
        };
        fs::create_dir_all(&dir).map_err(wrap)?;
        std::path::absolute(&dir).map_err(wrap)
    }
}
