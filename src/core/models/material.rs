//! Material model
//!
//! A material is a configured change source: which plugin implements it, and
//! the plugin-specific settings (repository URL, branch, ...) it is polled with.

use serde::{Deserialize, Serialize};

/// A single configuration entry on a material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationProperty {
    /// Configuration key (e.g., "url")
    pub key: String,

    /// Configured value
    pub value: String,
}

impl ConfigurationProperty {
    /// Create a new configuration property
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A pluggable SCM material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    /// Identifier of the plugin that implements this material
    pub plugin_id: String,

    /// Plugin-specific settings, in configured order
    #[serde(default)]
    pub configuration: Vec<ConfigurationProperty>,
}

impl Material {
    /// Create a material with no configuration
    #[must_use]
    pub fn new(plugin_id: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            configuration: Vec::new(),
        }
    }

    /// Add a configuration entry (builder style)
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.configuration.push(ConfigurationProperty::new(key, value));
        self
    }

    /// Look up a configured value by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.configuration.iter().find(|p| p.key == key).map(|p| p.value.as_str())
    }
}
