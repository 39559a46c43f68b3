//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundary between the polling core and the plugin
//! runtime. Implementations live in the `adapters` module.
//!
//! The core depends only on these traits, never on a concrete plugin.

mod scm_extension;
mod scm_plugin;

pub use scm_extension::{ExtensionError, ScmExtension};
pub use scm_plugin::{ScmPlugin, ScmProperty, ScmPropertyConfiguration};

#[cfg(test)]
pub(crate) use scm_extension::MockScmExtension;
#[cfg(test)]
pub(crate) use scm_plugin::MockScmPlugin;
