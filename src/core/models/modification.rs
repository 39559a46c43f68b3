//! Modification model
//!
//! The orchestrator's canonical record of one discovered change. Every
//! material type ends up here, so scheduling and change display never need
//! to know which plugin produced the data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{KnownRevision, RevisionData};

/// Change classification for a modified file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifiedAction {
    /// File was added
    Added,
    /// File was modified
    Modified,
    /// File was deleted
    Deleted,
    /// Change kind could not be classified
    #[default]
    Unknown,
}

impl std::fmt::Display for ModifiedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Modified => write!(f, "modified"),
            Self::Deleted => write!(f, "deleted"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A file touched by a modification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifiedFile {
    /// Path of the file
    pub file_name: String,

    /// Committish the file was modified in, when the source tracks it
    pub from_revision: Option<String>,

    /// How the file changed
    pub action: ModifiedAction,
}

/// A single discovered change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    /// Author
    pub user_name: Option<String>,

    /// Commit message / revision comment
    pub comment: Option<String>,

    /// Author email
    pub email_address: Option<String>,

    /// When the change was made
    pub modified_time: DateTime<Utc>,

    /// Revision identifier
    pub revision: String,

    /// Serialized plugin metadata (JSON object of string pairs)
    pub additional_data: Option<String>,

    /// Files touched, in reported order
    #[serde(default)]
    pub modified_files: Vec<ModifiedFile>,
}

impl Modification {
    /// Create a modification with no files
    #[must_use]
    pub const fn new(
        user_name: Option<String>,
        comment: Option<String>,
        email_address: Option<String>,
        modified_time: DateTime<Utc>,
        revision: String,
        additional_data: Option<String>,
    ) -> Self {
        Self {
            user_name,
            comment,
            email_address,
            modified_time,
            revision,
            additional_data,
            modified_files: Vec::new(),
        }
    }

    /// Append a modified file entry
    pub fn create_modified_file(
        &mut self,
        file_name: impl Into<String>,
        from_revision: Option<String>,
        action: ModifiedAction,
    ) {
        self.modified_files.push(ModifiedFile {
            file_name: file_name.into(),
            from_revision,
            action,
        });
    }

    /// Decode the plugin metadata stored with this modification
    ///
    /// A modification without stored metadata yields an empty bag.
    pub fn additional_data_map(&self) -> Result<RevisionData, serde_json::Error> {
        match self.additional_data.as_deref() {
            None | Some("") => Ok(RevisionData::new()),
            Some(json) => serde_json::from_str(json),
        }
    }

    /// Build the reference used to poll for revisions after this one
    pub fn known_revision(&self) -> Result<KnownRevision, serde_json::Error> {
        Ok(KnownRevision::new(
            self.revision.clone(),
            self.modified_time,
            self.additional_data_map()?,
        ))
    }
}
