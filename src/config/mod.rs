//! Configuration management for plugbot
//!
//! Configuration is declared as a set of groups, each with a static
//! [`ConfigSchema`]. A single generic routine ([`bind_group`]) reads every
//! field from an [`EnvSource`], applies defaults, coerces types and builds
//! the typed group. Binding happens once at startup; the resulting
//! [`Config`] is read-only for the rest of the process.

mod binder;
mod error;
mod groups;
mod schema;

pub use binder::{BoundGroup, EnvSource, ProcessEnv, bind, coerce, env_key};
pub use error::ConfigError;
pub use groups::{DatabaseConfig, LoggingConfig, TelegramConfig};
pub use schema::{ConfigField, ConfigSchema, FieldDefault, FieldType, Value};

/// A typed configuration group bound from a schema
pub trait ConfigGroup: Sized {
    /// Group name (e.g. "Telegram")
    const NAME: &'static str;

    /// Field descriptors in declaration order
    fn schema() -> ConfigSchema;

    /// Build the typed group from bound values
    ///
    /// # Errors
    ///
    /// Returns error if a field is missing from the bound group or has a
    /// different type than the accessor expects
    fn from_bound(bound: &BoundGroup) -> Result<Self, ConfigError>;
}

/// Bind a configuration group from a source
///
/// # Errors
///
/// Returns error if a required field has no value or a value cannot be
/// coerced to its declared type
pub fn bind_group<G: ConfigGroup>(source: &impl EnvSource) -> Result<G, ConfigError> {
    let bound = bind(&G::schema(), source)?;
    G::from_bound(&bound)
}

/// plugbot configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram credentials
    pub telegram: TelegramConfig,

    /// Database settings
    pub database: DatabaseConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Bind all groups from the process environment
    ///
    /// # Errors
    ///
    /// Returns the first configuration error encountered
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    /// Bind all groups from an arbitrary source
    ///
    /// Groups are bound in order: Telegram, Database, Logging.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error encountered
    pub fn from_source(source: &impl EnvSource) -> Result<Self, ConfigError> {
        let config = Self {
            telegram: bind_group(source)?,
            database: bind_group(source)?,
            logging: bind_group(source)?,
        };

        tracing::debug!(
            groups = ?[TelegramConfig::NAME, DatabaseConfig::NAME, LoggingConfig::NAME],
            "configuration bound"
        );

        Ok(config)
    }
}
