//! JSON message codec for external SCM plugins
//!
//! Plugins that live outside the process speak a small JSON protocol
//! (message version 1.0). Each call is one request body and one response
//! body:
//!
//! ```text
//! latest-revision         -> {"revision": {...}}
//! latest-revisions-since  -> {"revisions": [{...}, ...]}
//! ```
//!
//! Timestamps on the wire are UTC, formatted `yyyy-MM-ddTHH:mm:ss.SSSZ`.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::models::{RevisionData, ScmAction, ScmModifiedFile, ScmRevision};
use crate::core::ports::ScmPropertyConfiguration;

/// Message protocol version spoken by this codec
pub const MESSAGE_VERSION: &str = "1.0";

/// Request name for the latest revision call
pub const REQUEST_LATEST_REVISION: &str = "latest-revision";

/// Request name for the incremental call
pub const REQUEST_LATEST_REVISIONS_SINCE: &str = "latest-revisions-since";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Errors decoding plugin messages
#[derive(Debug, Error)]
pub enum MessageError {
    /// Body is not valid JSON or has the wrong shape
    #[error("invalid plugin message: {0}")]
    Json(#[from] serde_json::Error),

    /// Timestamp could not be parsed
    #[error("invalid timestamp in plugin message: {0}")]
    InvalidTimestamp(String),
}

#[derive(Serialize)]
struct ConfigValue<'a> {
    value: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct LatestRevisionRequest<'a> {
    scm_configuration: BTreeMap<&'a str, ConfigValue<'a>>,
    flyweight_folder: String,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct LatestRevisionsSinceRequest<'a> {
    scm_configuration: BTreeMap<&'a str, ConfigValue<'a>>,
    flyweight_folder: String,
    previous_revision: PreviousRevision<'a>,
}

#[derive(Serialize)]
struct PreviousRevision<'a> {
    revision: &'a str,
    timestamp: String,
    data: &'a RevisionData,
}

#[derive(Deserialize)]
struct LatestRevisionResponse {
    #[serde(default)]
    revision: Option<WireRevision>,
}

#[derive(Deserialize)]
struct LatestRevisionsSinceResponse {
    #[serde(default)]
    revisions: Option<Vec<WireRevision>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRevision {
    revision: String,
    timestamp: String,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    revision_comment: Option<String>,
    #[serde(default)]
    data: Option<RevisionData>,
    #[serde(default)]
    modified_files: Option<Vec<WireModifiedFile>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireModifiedFile {
    file_name: String,
    action: String,
}

impl TryFrom<WireRevision> for ScmRevision {
    type Error = MessageError;

    fn try_from(wire: WireRevision) -> Result<Self, Self::Error> {
        Ok(Self {
            revision: wire.revision,
            timestamp: parse_timestamp(&wire.timestamp)?,
            user: wire.user,
            revision_comment: wire.revision_comment,
            data: wire.data.unwrap_or_default(),
            modified_files: wire.modified_files.map(|files| {
                files
                    .into_iter()
                    .map(|f| ScmModifiedFile::new(f.file_name, ScmAction::from(f.action)))
                    .collect()
            }),
        })
    }
}

fn configuration(config: &ScmPropertyConfiguration) -> BTreeMap<&str, ConfigValue<'_>> {
    config
        .list()
        .iter()
        .map(|p| (p.key.as_str(), ConfigValue { value: &p.value }))
        .collect()
}

/// Format a timestamp the way plugins expect it
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a wire timestamp
///
/// Accepts RFC 3339 and the `+0000` offset variant some plugins emit.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, MessageError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| MessageError::InvalidTimestamp(raw.to_string()))
}

/// Build the `latest-revision` request body
pub fn latest_revision_request(
    config: &ScmPropertyConfiguration,
    working_dir: &Path,
) -> Result<String, MessageError> {
    let request = LatestRevisionRequest {
        scm_configuration: configuration(config),
        flyweight_folder: working_dir.to_string_lossy().into_owned(),
    };
    Ok(serde_json::to_string(&request)?)
}

/// Build the `latest-revisions-since` request body
pub fn latest_revisions_since_request(
    config: &ScmPropertyConfiguration,
    working_dir: &Path,
    previous: &ScmRevision,
) -> Result<String, MessageError> {
    let request = LatestRevisionsSinceRequest {
        scm_configuration: configuration(config),
        flyweight_folder: working_dir.to_string_lossy().into_owned(),
        previous_revision: PreviousRevision {
            revision: &previous.revision,
            timestamp: format_timestamp(&previous.timestamp),
            data: &previous.data,
        },
    };
    Ok(serde_json::to_string(&request)?)
}

/// Decode a `latest-revision` response
///
/// An empty body or a missing/null `revision` means nothing is discoverable.
pub fn parse_latest_revision_response(body: &str) -> Result<Option<ScmRevision>, MessageError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let response: LatestRevisionResponse = serde_json::from_str(body)?;
    response.revision.map(ScmRevision::try_from).transpose()
}

/// Decode a `latest-revisions-since` response, keeping the plugin's order
pub fn parse_latest_revisions_since_response(body: &str) -> Result<Vec<ScmRevision>, MessageError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let response: LatestRevisionsSinceResponse = serde_json::from_str(body)?;
    response.revisions.unwrap_or_default().into_iter().map(ScmRevision::try_from).collect()
}
