//! Plugin registry - resolves plugin identifiers to implementations
//!
//! The registry is the runtime side of the plugin boundary: the poller asks
//! for "plugin X", the registry finds X and forwards the call verbatim.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::core::models::ScmRevision;
use crate::core::ports::{ExtensionError, ScmExtension, ScmPlugin, ScmPropertyConfiguration};

/// Registry of SCM plugins keyed by plugin id
#[derive(Default, Clone)]
pub struct ExtensionRegistry {
    plugins: BTreeMap<String, Arc<dyn ScmPlugin>>,
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRegistry").field("plugins", &self.plugin_ids()).finish()
    }
}

impl ExtensionRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under `id`
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::DuplicatePlugin`] if `id` is taken.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        plugin: Arc<dyn ScmPlugin>,
    ) -> Result<(), ExtensionError> {
        let id = id.into();
        if self.plugins.contains_key(&id) {
            return Err(ExtensionError::DuplicatePlugin(id));
        }
        debug!("registered SCM plugin '{id}'");
        self.plugins.insert(id, plugin);
        Ok(())
    }

    /// Whether a plugin is registered under `id`
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.plugins.contains_key(id)
    }

    /// Registered plugin ids, sorted
    #[must_use]
    pub fn plugin_ids(&self) -> Vec<&str> {
        self.plugins.keys().map(String::as_str).collect()
    }

    fn plugin(&self, id: &str) -> Result<&Arc<dyn ScmPlugin>, ExtensionError> {
        self.plugins.get(id).ok_or_else(|| ExtensionError::PluginNotFound(id.to_string()))
    }
}

impl ScmExtension for ExtensionRegistry {
    fn latest_revision(
        &self,
        plugin_id: &str,
        config: &ScmPropertyConfiguration,
        working_dir: &Path,
    ) -> anyhow::Result<Option<ScmRevision>> {
        self.plugin(plugin_id)?.latest_revision(config, working_dir)
    }

    fn latest_modification_since(
        &self,
        plugin_id: &str,
        config: &ScmPropertyConfiguration,
        working_dir: &Path,
        previous: &ScmRevision,
    ) -> anyhow::Result<Vec<ScmRevision>> {
        self.plugin(plugin_id)?.latest_revisions_since(config, working_dir, previous)
    }
}
