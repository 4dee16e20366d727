//! Plugin loader - turn a directory of source units into routers

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::descriptor::{LoadReport, PluginDescriptor, PluginStatus};
use super::discovery::discover_sources;
use super::source::{Evaluated, evaluate};
use super::{DEFAULT_PLUGIN_DIR, PLUGIN_EXTENSION};
use crate::Result;

/// Failure to load a single source unit
///
/// Always contained at the unit boundary and recorded in that unit's
/// descriptor; never aborts a load pass.
#[derive(Debug, Error)]
pub enum PluginLoadError {
    /// Source file could not be read
    #[error("failed to read source: {0}")]
    Read(#[from] std::io::Error),

    /// Source is not valid TOML
    #[error("syntax error: {0}")]
    Parse(#[from] toml::de::Error),

    /// `router` is present but is not a routing table
    #[error("`router` is not a routing table: {0}")]
    InvalidExport(String),

    /// A declared route could not be built
    #[error("{0}")]
    Evaluate(String),
}

/// Loads plugins from a single directory
///
/// Every call to [`PluginLoader::load`] re-reads and re-evaluates every
/// source unit; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct PluginLoader {
    dir: PathBuf,
    extension: String,
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::new(DEFAULT_PLUGIN_DIR)
    }
}

impl PluginLoader {
    /// Create a loader for a plugin directory
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: PLUGIN_EXTENSION.to_string(),
        }
    }

    /// Override the source unit file extension (without the dot)
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Plugin directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Namespace prefix for units in this directory
    fn namespace_prefix(&self) -> &str {
        self.dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_PLUGIN_DIR)
    }

    /// Discover and load every plugin in the directory
    ///
    /// A missing directory is created and yields an empty report. Units
    /// are loaded in file name order; a failing unit is recorded as
    /// [`PluginStatus::Failed`] and loading continues with the next one.
    ///
    /// # Errors
    ///
    /// Returns error only if the directory itself cannot be created or read
    pub fn load(&self) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
            tracing::info!(path = %self.dir.display(), "created plugins directory");
            return Ok(report);
        }

        let sources = discover_sources(&self.dir, &self.extension)?;
        tracing::debug!(
            path = %self.dir.display(),
            count = sources.len(),
            "discovered plugin sources"
        );

        for path in sources {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let qualified = format!("{}.{stem}", self.namespace_prefix());

            let span = tracing::debug_span!("plugin", name = %qualified);
            let _enter = span.enter();

            let descriptor = PluginDescriptor::new(&path, stem, &qualified);

            let descriptor = match self.load_unit(&path, &qualified) {
                Ok(Evaluated::Router(router)) => {
                    tracing::debug!(
                        commands = router.commands().len(),
                        messages = router.messages().len(),
                        "plugin evaluated"
                    );
                    report.routers.push(router);
                    descriptor.with_status(PluginStatus::Loaded, None)
                }
                Ok(Evaluated::Skipped(reason)) => {
                    tracing::debug!(reason = %reason, "plugin skipped");
                    descriptor.with_status(PluginStatus::Skipped, Some(reason))
                }
                Err(e) => {
                    tracing::debug!(error = %e, "plugin failed");
                    descriptor.with_status(PluginStatus::Failed, Some(e.to_string()))
                }
            };

            report.descriptors.push(descriptor);
        }

        Ok(report)
    }

    /// Read and evaluate one source unit
    fn load_unit(&self, path: &Path, namespace: &str) -> std::result::Result<Evaluated, PluginLoadError> {
        let text = std::fs::read_to_string(path)?;
        evaluate(&text, &self.dir, namespace)
    }
}

/// Load plugins from a directory with the default extension
///
/// # Errors
///
/// Returns error only if the directory itself cannot be created or read
pub fn load_plugins(dir: impl Into<PathBuf>) -> Result<LoadReport> {
    PluginLoader::new(dir).load()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ECHO: &str = "[[router.commands]]\ncommand = \"echo\"\nreply = \"{{args}}\"\n";

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let plugins = dir.path().join("nested").join("plugins");

        let report = PluginLoader::new(&plugins).load().unwrap();

        assert!(plugins.is_dir());
        assert!(report.is_empty());
        assert!(report.routers.is_empty());
    }

    #[test]
    fn namespace_uses_directory_name() {
        let dir = tempfile::tempdir().unwrap();
        let plugins = dir.path().join("bot_plugins");
        std::fs::create_dir(&plugins).unwrap();
        std::fs::write(plugins.join("echo.toml"), ECHO).unwrap();

        let report = PluginLoader::new(&plugins).load().unwrap();

        assert_eq!(report.descriptors[0].qualified_name, "bot_plugins.echo");
        assert_eq!(report.routers[0].namespace(), "bot_plugins.echo");
    }

    #[test]
    fn custom_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("echo.plugin"), ECHO).unwrap();
        std::fs::write(dir.path().join("other.toml"), ECHO).unwrap();

        let report = PluginLoader::new(dir.path())
            .with_extension("plugin")
            .load()
            .unwrap();

        assert_eq!(report.descriptors.len(), 1);
        assert_eq!(report.descriptors[0].name, "echo");
    }

    #[test]
    fn skipped_unit_has_no_router() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("helpers.toml"), "[plugin]\n").unwrap();

        let report = PluginLoader::new(dir.path()).load().unwrap();

        assert_eq!(report.descriptors[0].status, PluginStatus::Skipped);
        assert!(report.routers.is_empty());
        assert!(!report.has_failures());
    }
}
