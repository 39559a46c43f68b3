//! Adapter implementations for port traits
//!
//! This module contains concrete plugins that handle I/O:
//!
//! - `git/` - Built-in git plugin (libgit2)
//! - `process/` - External executable plugins
//! - `message/` - JSON message codec spoken by external plugins

pub mod git;
pub mod message;
pub mod process;

pub use git::GitPlugin;
pub use process::ProcessPlugin;
