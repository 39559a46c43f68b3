//! SCM extension port
//!
//! The plugin boundary as the poller sees it: every call names the plugin
//! that should answer it.

use std::path::Path;

use thiserror::Error;

use super::ScmPropertyConfiguration;
use crate::core::models::ScmRevision;

/// Errors raised by the extension boundary itself (not by plugins)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtensionError {
    /// No plugin is registered under the requested id
    #[error("no SCM plugin registered with id '{0}'")]
    PluginNotFound(String),

    /// A plugin with this id is already registered
    #[error("SCM plugin '{0}' is already registered")]
    DuplicatePlugin(String),
}

/// Plugin boundary, dispatched by plugin identifier
#[cfg_attr(test, mockall::automock)]
pub trait ScmExtension: Send + Sync {
    /// Ask plugin `plugin_id` for its latest revision
    fn latest_revision(
        &self,
        plugin_id: &str,
        config: &ScmPropertyConfiguration,
        working_dir: &Path,
    ) -> anyhow::Result<Option<ScmRevision>>;

    /// Ask plugin `plugin_id` for every revision newer than `previous`
    fn latest_modification_since(
        &self,
        plugin_id: &str,
        config: &ScmPropertyConfiguration,
        working_dir: &Path,
        previous: &ScmRevision,
    ) -> anyhow::Result<Vec<ScmRevision>>;
}
