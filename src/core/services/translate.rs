//! Translation between plugin-native and orchestrator vocabularies
//!
//! Pure functions: material configuration in, plugin configuration out;
//! plugin revision in, modification out.

use crate::core::models::{
    Material, Modification, ModifiedAction, RevisionData, ScmAction, ScmRevision,
};
use crate::core::ports::{ScmProperty, ScmPropertyConfiguration};

/// Project a material's configuration into the plugin-facing view
///
/// Every entry is copied as-is. No filtering, masking or coercion.
#[must_use]
pub fn build_scm_configuration(material: &Material) -> ScmPropertyConfiguration {
    let mut config = ScmPropertyConfiguration::new();
    for property in &material.configuration {
        config.add(ScmProperty::new(property.key.clone(), property.value.clone()));
    }
    config
}

/// Map a plugin change kind onto the orchestrator's closed set
///
/// Total: anything unrecognized becomes [`ModifiedAction::Unknown`].
#[must_use]
pub const fn convert_action(action: &ScmAction) -> ModifiedAction {
    match action {
        ScmAction::Added => ModifiedAction::Added,
        ScmAction::Modified => ModifiedAction::Modified,
        ScmAction::Deleted => ModifiedAction::Deleted,
        ScmAction::Unknown(_) => ModifiedAction::Unknown,
    }
}

/// Serialize a revision's metadata bag for persistence
pub fn serialize_data(data: &RevisionData) -> Result<String, serde_json::Error> {
    serde_json::to_string(data)
}

/// Convert one plugin revision into a modification
///
/// Email and "modified in" are never supplied by plugins and stay empty.
pub fn to_modification(revision: &ScmRevision) -> Result<Modification, serde_json::Error> {
    let mut modification = Modification::new(
        revision.user.clone(),
        revision.revision_comment.clone(),
        None,
        revision.timestamp,
        revision.revision.clone(),
        Some(serialize_data(&revision.data)?),
    );
    for file in revision.modified_files.iter().flatten() {
        let action = convert_action(&file.action);
        modification.create_modified_file(file.file_name.clone(), None, action);
    }
    Ok(modification)
}
