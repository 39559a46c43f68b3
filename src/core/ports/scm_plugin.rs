//! SCM plugin port
//!
//! Defines the contract a single source control plugin implements, and the
//! configuration shape it is handed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::models::ScmRevision;

/// One plugin-facing configuration entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmProperty {
    /// Configuration key
    pub key: String,

    /// Configured value
    pub value: String,
}

impl ScmProperty {
    /// Create a new property
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The configuration view a plugin polls with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmPropertyConfiguration {
    properties: Vec<ScmProperty>,
}

impl ScmPropertyConfiguration {
    /// Create an empty configuration
    #[must_use]
    pub const fn new() -> Self {
        Self {
            properties: Vec::new(),
        }
    }

    /// Add a property
    pub fn add(&mut self, property: ScmProperty) {
        self.properties.push(property);
    }

    /// Look up a property by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ScmProperty> {
        self.properties.iter().find(|p| p.key == key)
    }

    /// Look up a property value by key
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(|p| p.value.as_str())
    }

    /// All properties, in insertion order
    #[must_use]
    pub fn list(&self) -> &[ScmProperty] {
        &self.properties
    }

    /// Number of properties
    #[must_use]
    pub fn size(&self) -> usize {
        self.properties.len()
    }

    /// Whether no properties are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// A source control plugin
///
/// Implementations talk to a concrete SCM (git, an external executable, ...)
/// and report revisions in plugin-native form.
#[cfg_attr(test, mockall::automock)]
pub trait ScmPlugin: Send + Sync {
    /// Get the latest revision, or `None` if nothing is discoverable
    ///
    /// `working_dir` is scratch space owned by the plugin for this material.
    fn latest_revision(
        &self,
        config: &ScmPropertyConfiguration,
        working_dir: &Path,
    ) -> anyhow::Result<Option<ScmRevision>>;

    /// Get every revision newer than `previous`
    ///
    /// `previous` only carries revision, timestamp and data.
    fn latest_revisions_since(
        &self,
        config: &ScmPropertyConfiguration,
        working_dir: &Path,
        previous: &ScmRevision,
    ) -> anyhow::Result<Vec<ScmRevision>>;
}
