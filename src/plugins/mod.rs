//! Plugin system for plugbot
//!
//! Plugins are TOML source units placed directly in a plugin directory
//! (default `plugins/`). Each unit is evaluated on its own; the `router`
//! table it exports becomes a [`crate::dispatch::Router`]. Failures are
//! recorded per unit and never stop the remaining units from loading.

mod descriptor;
mod discovery;
mod loader;
mod source;

pub use descriptor::{LoadReport, PluginDescriptor, PluginStatus};
pub use discovery::discover_sources;
pub use loader::{PluginLoadError, PluginLoader, load_plugins};
pub use source::{Evaluated, evaluate};

/// Default plugin directory, relative to the working directory
pub const DEFAULT_PLUGIN_DIR: &str = "plugins";

/// File extension of plugin source units
pub const PLUGIN_EXTENSION: &str = "toml";

/// Files starting with this character are never loaded
pub const PRIVATE_MARKER: char = '_';
