//! Built-in git SCM plugin
//!
//! Implements `ScmPlugin` with libgit2. Configuration keys:
//!
//! - `url` (required) - repository to poll
//! - `branch` (optional, default `master`) - branch to follow
//!
//! A `url` that names a local repository is read in place. Anything else is
//! cloned into the material's working directory on first poll and fetched
//! from `origin` afterwards. `origin` is re-pointed when `url` changes.

use std::path::Path;

use chrono::{DateTime, Utc};
use git2::{Commit, Delta, ErrorCode, Oid, Repository, Sort};
use log::{debug, warn};
use thiserror::Error;

use crate::core::models::{RevisionData, ScmAction, ScmModifiedFile, ScmRevision};
use crate::core::ports::{ScmPlugin, ScmPropertyConfiguration};

/// Plugin id the git plugin is registered under
pub const PLUGIN_ID: &str = "git";

/// Configuration key for the repository location
pub const URL_KEY: &str = "url";

/// Configuration key for the branch to follow
pub const BRANCH_KEY: &str = "branch";

/// Branch used when none is configured
pub const DEFAULT_BRANCH: &str = "master";

/// Errors from the git plugin
#[derive(Debug, Error)]
pub enum GitPluginError {
    /// A required configuration key is missing
    #[error("missing required configuration '{0}'")]
    MissingConfig(&'static str),

    /// libgit2 failure
    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}

/// Git-backed SCM plugin
#[derive(Debug, Clone, Copy, Default)]
pub struct GitPlugin;

/// An opened repository and the ref that holds the branch tip
struct Checkout {
    repo: Repository,
    tip_ref: String,
}

impl GitPlugin {
    /// Create the plugin
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn open(
        config: &ScmPropertyConfiguration,
        working_dir: &Path,
    ) -> Result<(Checkout, String), GitPluginError> {
        let url = config.value(URL_KEY).ok_or(GitPluginError::MissingConfig(URL_KEY))?;
        let branch = config.value(BRANCH_KEY).unwrap_or(DEFAULT_BRANCH).to_string();

        let local = Path::new(url);
        if local.is_dir()
            && let Ok(repo) = Repository::open(local)
        {
            debug!("reading local repository {url} in place");
            let tip_ref = format!("refs/heads/{branch}");
            return Ok((Checkout { repo, tip_ref }, branch));
        }

        let tip_ref = format!("refs/remotes/origin/{branch}");
        let repo = match Repository::open(working_dir) {
            Ok(repo) => {
                let origin = repo.find_remote("origin")?.url().map(String::from);
                if origin.as_deref() != Some(url) {
                    debug!(
                        "origin of {} moved from {} to {url}",
                        working_dir.display(),
                        origin.as_deref().unwrap_or("<none>")
                    );
                    repo.remote_set_url("origin", url)?;
                }
                debug!("fetching {branch} from {url} into {}", working_dir.display());
                let refspec = format!("+refs/heads/{branch}:{tip_ref}");
                repo.find_remote("origin")?.fetch(&[refspec.as_str()], None, None)?;
                repo
            },
            Err(_) => {
                debug!("cloning {url} into {}", working_dir.display());
                git2::build::RepoBuilder::new().clone(url, working_dir)?
            },
        };
        Ok((Checkout { repo, tip_ref }, branch))
    }

    fn tip(checkout: &Checkout) -> Result<Option<Oid>, GitPluginError> {
        match checkout.repo.find_reference(&checkout.tip_ref) {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id())),
            Err(err) if err.code() == ErrorCode::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Resolve a full or abbreviated revision id to a commit
    fn resolve(repo: &Repository, revision: &str) -> Result<Option<Oid>, GitPluginError> {
        match repo.revparse_single(revision) {
            Ok(object) => Ok(Some(object.peel_to_commit()?.id())),
            Err(err) if err.code() == ErrorCode::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Describe one commit as a plugin revision
fn to_revision(
    repo: &Repository,
    commit: &Commit<'_>,
    branch: &str,
) -> Result<ScmRevision, GitPluginError> {
    let mut data = RevisionData::new();
    data.insert(BRANCH_KEY.to_string(), branch.to_string());

    Ok(ScmRevision {
        revision: commit.id().to_string(),
        timestamp: DateTime::<Utc>::from_timestamp(commit.time().seconds(), 0)
            .unwrap_or_default(),
        user: commit.author().name().map(String::from),
        revision_comment: commit.message().map(|m| m.trim_end().to_string()),
        data,
        modified_files: Some(modified_files(repo, commit)?),
    })
}

/// Tree diff against the first parent (or the empty tree for a root commit)
fn modified_files(
    repo: &Repository,
    commit: &Commit<'_>,
) -> Result<Vec<ScmModifiedFile>, GitPluginError> {
    let tree = commit.tree()?;
    let parent_tree = match commit.parents().next() {
        Some(parent) => Some(parent.tree()?),
        None => None,
    };
    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

    Ok(diff
        .deltas()
        .filter_map(|delta| {
            let file = match delta.status() {
                Delta::Deleted => delta.old_file(),
                _ => delta.new_file(),
            };
            let path = file.path()?.to_string_lossy().into_owned();
            Some(ScmModifiedFile::new(path, action(delta.status())))
        })
        .collect())
}

fn action(status: Delta) -> ScmAction {
    match status {
        Delta::Added => ScmAction::Added,
        Delta::Modified => ScmAction::Modified,
        Delta::Deleted => ScmAction::Deleted,
        other => ScmAction::Unknown(format!("{other:?}").to_lowercase()),
    }
}

impl ScmPlugin for GitPlugin {
    fn latest_revision(
        &self,
        config: &ScmPropertyConfiguration,
        working_dir: &Path,
    ) -> anyhow::Result<Option<ScmRevision>> {
        let (checkout, branch) = Self::open(config, working_dir)?;
        let Some(oid) = Self::tip(&checkout)? else {
            return Ok(None);
        };
        let commit = checkout.repo.find_commit(oid)?;
        Ok(Some(to_revision(&checkout.repo, &commit, &branch)?))
    }

    fn latest_revisions_since(
        &self,
        config: &ScmPropertyConfiguration,
        working_dir: &Path,
        previous: &ScmRevision,
    ) -> anyhow::Result<Vec<ScmRevision>> {
        let (checkout, branch) = Self::open(config, working_dir)?;
        let Some(tip) = Self::tip(&checkout)? else {
            return Ok(Vec::new());
        };
        let repo = &checkout.repo;

        let mut walk = repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        walk.push(tip)?;

        match Self::resolve(repo, &previous.revision)? {
            Some(oid) => walk.hide(oid)?,
            None => {
                // History no longer contains the previous revision; report the tip only
                warn!(
                    "revision {} not found on {branch}, reporting latest only",
                    previous.revision
                );
                let commit = repo.find_commit(tip)?;
                return Ok(vec![to_revision(repo, &commit, &branch)?]);
            },
        }

        let mut revisions = Vec::new();
        for oid in walk {
            let commit = repo.find_commit(oid?)?;
            revisions.push(to_revision(repo, &commit, &branch)?);
        }
        Ok(revisions)
    }
}
