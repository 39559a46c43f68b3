//! Domain models for scmpoll
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`Material`] - A configured change source (plugin id + settings)
//! - [`ScmRevision`] - A revision as a plugin reports it
//! - [`KnownRevision`] - The last recorded revision, bound for delta polls
//! - [`Modification`] - The orchestrator's canonical change record

mod material;
mod modification;
mod revision;

pub use material::{ConfigurationProperty, Material};
pub use modification::{Modification, ModifiedAction, ModifiedFile};
pub use revision::{KnownRevision, RevisionData, ScmAction, ScmModifiedFile, ScmRevision};
