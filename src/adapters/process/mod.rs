//! External executable SCM plugin
//!
//! Runs a plugin program once per call: `<command> [args...] <request-name>`,
//! with the JSON request on stdin and the JSON response expected on stdout.
//! The material's working directory is the child's cwd.

use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStdin, Command, ExitStatus, Stdio};
use std::thread;

use log::debug;
use thiserror::Error;

use crate::adapters::message::{
    self, MESSAGE_VERSION, REQUEST_LATEST_REVISION, REQUEST_LATEST_REVISIONS_SINCE,
};
use crate::core::models::ScmRevision;
use crate::core::ports::{ScmPlugin, ScmPropertyConfiguration};

/// Environment variable carrying the message protocol version
pub const MESSAGE_VERSION_ENV: &str = "SCMPOLL_MESSAGE_VERSION";

/// Errors running a plugin executable
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be started
    #[error("failed to start plugin '{}': {source}", command.display())]
    Spawn {
        /// Program that failed to start
        command: PathBuf,
        /// Underlying IO error
        source: io::Error,
    },

    /// IO error talking to the running plugin
    #[error("io error talking to plugin: {0}")]
    Io(#[from] io::Error),

    /// The plugin exited unsuccessfully
    #[error("plugin exited with {status}: {stderr}")]
    Failed {
        /// Exit status
        status: ExitStatus,
        /// Captured stderr, trimmed
        stderr: String,
    },

    /// Stdout was not UTF-8
    #[error("plugin output is not valid UTF-8")]
    InvalidOutput,
}

/// SCM plugin backed by an external program
#[derive(Debug, Clone)]
pub struct ProcessPlugin {
    command: PathBuf,
    args: Vec<String>,
}

impl ProcessPlugin {
    /// Create a plugin that runs `command` with leading `args`
    #[must_use]
    pub fn new(command: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Run one request and return the response body
    fn call(
        &self,
        request_name: &str,
        body: &str,
        working_dir: &Path,
    ) -> Result<String, ProcessError> {
        debug!(
            "running plugin {} {request_name} in {}",
            self.command.display(),
            working_dir.display()
        );

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .arg(request_name)
            .current_dir(working_dir)
            .env(MESSAGE_VERSION_ENV, MESSAGE_VERSION)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        // Feed stdin while stdout and stderr drain, or a plugin that answers
        // before reading its request blocks on a full pipe.
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || write_request(stdin, body));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("plugin stdin writer panicked")));
            (written, output)
        });
        written?;
        let output = output?;
        if !output.status.success() {
            return Err(ProcessError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| ProcessError::InvalidOutput)
    }
}

/// Write the request, closing stdin afterwards
///
/// A plugin may exit without reading its request.
fn write_request(stdin: Option<ChildStdin>, body: &str) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(body.as_bytes()) {
        Err(err) if err.kind() != ErrorKind::BrokenPipe => Err(err),
        _ => Ok(()),
    }
}

impl ScmPlugin for ProcessPlugin {
    fn latest_revision(
        &self,
        config: &ScmPropertyConfiguration,
        working_dir: &Path,
    ) -> anyhow::Result<Option<ScmRevision>> {
        let request = message::latest_revision_request(config, working_dir)?;
        let response = self.call(REQUEST_LATEST_REVISION, &request, working_dir)?;
        Ok(message::parse_latest_revision_response(&response)?)
    }

    fn latest_revisions_since(
        &self,
        config: &ScmPropertyConfiguration,
        working_dir: &Path,
        previous: &ScmRevision,
    ) -> anyhow::Result<Vec<ScmRevision>> {
        let request = message::latest_revisions_since_request(config, working_dir, previous)?;
        let response = self.call(REQUEST_LATEST_REVISIONS_SINCE, &request, working_dir)?;
        Ok(message::parse_latest_revisions_since_response(&response)?)
    }
}
