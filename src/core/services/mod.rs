//! Business logic services
//!
//! - [`poller`] - Latest / since polling through the plugin boundary
//! - [`translate`] - Configuration projection and revision conversion
//! - [`registry`] - Plugin id to implementation dispatch

pub mod poller;
pub mod registry;
pub mod translate;

pub use poller::{MaterialPoller, ScmMaterialPoller};
pub use registry::ExtensionRegistry;
pub use translate::{build_scm_configuration, convert_action, to_modification};
