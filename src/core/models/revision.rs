//! Revision models
//!
//! Plugin-native vocabulary: what an SCM plugin reports for a discovered
//! change, and the reference the orchestrator hands back for delta polling.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque plugin-private metadata attached to a revision
///
/// Ordered so that serializing the same bag always yields the same string.
pub type RevisionData = BTreeMap<String, String>;

/// Plugin-native change kind for a single file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScmAction {
    /// File was added
    Added,
    /// File was modified
    Modified,
    /// File was deleted
    Deleted,
    /// Anything the plugin reported that is not one of the above
    Unknown(String),
}

impl ScmAction {
    /// Wire name of the action
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for ScmAction {
    fn from(s: &str) -> Self {
        match s {
            "added" => Self::Added,
            "modified" => Self::Modified,
            "deleted" => Self::Deleted,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for ScmAction {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<ScmAction> for String {
    fn from(action: ScmAction) -> Self {
        action.as_str().to_string()
    }
}

impl std::str::FromStr for ScmAction {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl std::fmt::Display for ScmAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file-level change reported by a plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmModifiedFile {
    /// Path of the changed file
    pub file_name: String,

    /// What happened to it
    pub action: ScmAction,
}

impl ScmModifiedFile {
    /// Create a new modified file entry
    #[must_use]
    pub fn new(file_name: impl Into<String>, action: impl Into<ScmAction>) -> Self {
        Self {
            file_name: file_name.into(),
            action: action.into(),
        }
    }
}

/// A single revision as reported by an SCM plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmRevision {
    /// Revision identifier (commit hash, changelist number, ...)
    pub revision: String,

    /// When the revision was made
    pub timestamp: DateTime<Utc>,

    /// Author of the revision
    pub user: Option<String>,

    /// Human-readable comment
    pub revision_comment: Option<String>,

    /// Plugin-private metadata
    #[serde(default)]
    pub data: RevisionData,

    /// Files changed in this revision, if the plugin reported any
    pub modified_files: Option<Vec<ScmModifiedFile>>,
}

impl ScmRevision {
    /// Create a revision carrying only identity, time and metadata
    ///
    /// Author, comment and file list are left unset.
    #[must_use]
    pub fn new(revision: impl Into<String>, timestamp: DateTime<Utc>, data: RevisionData) -> Self {
        Self {
            revision: revision.into(),
            timestamp,
            user: None,
            revision_comment: None,
            data,
            modified_files: None,
        }
    }
}

/// The last revision the orchestrator recorded for a material
///
/// Only used as the lower bound of an incremental poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownRevision {
    /// Revision identifier
    pub revision: String,

    /// When the revision was made
    pub timestamp: DateTime<Utc>,

    /// Plugin-private metadata recorded with the revision
    #[serde(default)]
    pub data: RevisionData,
}

impl KnownRevision {
    /// Create a known revision reference
    #[must_use]
    pub fn new(revision: impl Into<String>, timestamp: DateTime<Utc>, data: RevisionData) -> Self {
        Self {
            revision: revision.into(),
            timestamp,
            data,
        }
    }
}

impl From<&KnownRevision> for ScmRevision {
    fn from(known: &KnownRevision) -> Self {
        Self::new(known.revision.clone(), known.timestamp, known.data.clone())
    }
}
