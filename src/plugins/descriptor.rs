//! Per-plugin load outcomes

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::dispatch::Router;

/// Load outcome of a single source unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginStatus {
    /// Exported a router that was extracted
    Loaded,
    /// Reading, parsing or evaluating the unit failed
    Failed,
    /// Loaded cleanly but exported no router (or is disabled)
    Skipped,
}

impl PluginStatus {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// One discovered source unit and what happened when it was loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginDescriptor {
    /// Path of the source file
    pub source_path: PathBuf,
    /// File stem (e.g. `echo` for `echo.toml`)
    pub name: String,
    /// Namespace the unit was loaded under (`<directory>.<stem>`)
    pub qualified_name: String,
    /// Load outcome
    pub status: PluginStatus,
    /// Failure or skip reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PluginDescriptor {
    pub(crate) fn new(source_path: &Path, name: &str, qualified_name: &str) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
            name: name.to_string(),
            qualified_name: qualified_name.to_string(),
            status: PluginStatus::Skipped,
            error: None,
        }
    }

    pub(crate) fn with_status(mut self, status: PluginStatus, error: Option<String>) -> Self {
        self.status = status;
        self.error = error;
        self
    }
}

/// Everything a load pass produced, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// One descriptor per discovered unit
    pub descriptors: Vec<PluginDescriptor>,
    /// Routers extracted from loaded units
    pub routers: Vec<Router>,
}

impl LoadReport {
    /// Descriptors with a given status
    pub fn with_status(&self, status: PluginStatus) -> impl Iterator<Item = &PluginDescriptor> {
        self.descriptors.iter().filter(move |d| d.status == status)
    }

    /// Descriptors of units that loaded
    pub fn loaded(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.with_status(PluginStatus::Loaded)
    }

    /// Descriptors of units that failed
    pub fn failed(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.with_status(PluginStatus::Failed)
    }

    /// Whether any unit failed
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    /// Whether nothing was discovered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
