//! Core domain logic for scmpoll
//!
//! This module contains the polling and translation logic with no I/O of its
//! own. All plugin interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Material, ScmRevision, Modification)
//! - `services/` - Polling, translation, plugin dispatch
//! - `ports/` - Trait definitions for the plugin boundary

pub mod models;
pub mod ports;
pub mod services;
