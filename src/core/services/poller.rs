//! Material poller - discovers new revisions through the plugin boundary
//!
//! Each call is a single synchronous request/response. The poller holds no
//! mutable state; callers decide how many materials to poll in parallel.
//!
//! Plugin failures are returned unchanged, and a call never yields a partial
//! list: either every revision converts or the whole call fails.

use std::path::Path;

use log::debug;

use super::translate::{build_scm_configuration, to_modification};
use crate::core::models::{KnownRevision, Material, Modification, ScmRevision};
use crate::core::ports::ScmExtension;

/// Polls a material for modifications
pub trait MaterialPoller: Send + Sync {
    /// Get the latest modification of a material
    ///
    /// Returns an empty list when the source has no revision yet, otherwise
    /// exactly one modification.
    fn latest_modification(
        &self,
        material: &Material,
        working_dir: &Path,
    ) -> anyhow::Result<Vec<Modification>>;

    /// Get every modification after `known`, in the order the source reports them
    fn modifications_since(
        &self,
        material: &Material,
        working_dir: &Path,
        known: &KnownRevision,
    ) -> anyhow::Result<Vec<Modification>>;
}

/// Poller for plugin-backed SCM materials
#[derive(Debug, Clone)]
pub struct ScmMaterialPoller<E> {
    extension: E,
}

impl<E: ScmExtension> ScmMaterialPoller<E> {
    /// Create a poller over the given plugin boundary
    #[must_use]
    pub const fn new(extension: E) -> Self {
        Self { extension }
    }

    /// The plugin boundary this poller calls into
    #[must_use]
    pub const fn extension(&self) -> &E {
        &self.extension
    }
}

impl<E: ScmExtension> MaterialPoller for ScmMaterialPoller<E> {
    fn latest_modification(
        &self,
        material: &Material,
        working_dir: &Path,
    ) -> anyhow::Result<Vec<Modification>> {
        let config = build_scm_configuration(material);
        let revision = self.extension.latest_revision(&material.plugin_id, &config, working_dir)?;

        debug!(
            "plugin '{}' latest revision: {}",
            material.plugin_id,
            revision.as_ref().map_or("<none>", |r| r.revision.as_str())
        );

        match revision {
            Some(revision) => Ok(vec![to_modification(&revision)?]),
            None => Ok(Vec::new()),
        }
    }

    fn modifications_since(
        &self,
        material: &Material,
        working_dir: &Path,
        known: &KnownRevision,
    ) -> anyhow::Result<Vec<Modification>> {
        let config = build_scm_configuration(material);
        let previous = ScmRevision::from(known);
        let revisions = self.extension.latest_modification_since(
            &material.plugin_id,
            &config,
            working_dir,
            &previous,
        )?;

        debug!(
            "plugin '{}' reported {} revision(s) since {}",
            material.plugin_id,
            revisions.len(),
            known.revision
        );

        revisions.iter().map(|r| to_modification(r).map_err(Into::into)).collect()
    }
}
