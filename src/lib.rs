//! plugbot - chat bot host with pluggable command routing
//!
//! This library provides the startup path of the bot process:
//! - Typed configuration groups bound from environment variables
//! - Plugin discovery and loading from a plugin directory
//! - A dispatch engine that plugin routers are merged into
//!
//! # Architecture
//!
//! ```text
//! environment ──▶ config::bind_group ──▶ Config ─────────┐
//!                                                         ▼
//! plugins/*.toml ──▶ PluginLoader ──▶ LoadReport ──▶ Dispatcher ──▶ replies
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod plugins;

pub use config::{Config, ConfigError, ConfigGroup, EnvSource, bind_group};
pub use dispatch::{DispatchEngine, Dispatcher, Router, Update};
pub use error::{Error, Result};
pub use plugins::{LoadReport, PluginDescriptor, PluginLoader, PluginStatus, load_plugins};
