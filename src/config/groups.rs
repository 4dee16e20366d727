//! Configuration groups read by the bot process

use secrecy::SecretString;

use super::ConfigGroup;
use super::binder::BoundGroup;
use super::error::ConfigError;
use super::schema::{ConfigField, ConfigSchema, FieldType};

/// Telegram bot credentials and transport settings
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token (`BOT_TOKEN`)
    pub bot_token: SecretString,
    /// Default parse mode for outgoing messages (`PARSE_MODE`)
    pub parse_mode: String,
    /// Long-poll timeout in seconds (`POLL_TIMEOUT`)
    pub poll_timeout: i64,
}

impl ConfigGroup for TelegramConfig {
    const NAME: &'static str = "Telegram";

    fn schema() -> ConfigSchema {
        ConfigSchema::new(Self::NAME)
            .field(ConfigField::required("botToken", FieldType::String))
            .field(ConfigField::with_default("parseMode", FieldType::String, "HTML"))
            .field(ConfigField::with_default("pollTimeout", FieldType::Integer, "30"))
    }

    fn from_bound(bound: &BoundGroup) -> Result<Self, ConfigError> {
        Ok(Self {
            bot_token: SecretString::from(bound.string("botToken")?.to_string()),
            parse_mode: bound.string("parseMode")?.to_string(),
            poll_timeout: bound.integer("pollTimeout")?,
        })
    }
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Connection URI (`URI`)
    pub uri: String,
}

impl ConfigGroup for DatabaseConfig {
    const NAME: &'static str = "Database";

    fn schema() -> ConfigSchema {
        ConfigSchema::new(Self::NAME).field(ConfigField::with_default(
            "uri",
            FieldType::String,
            "sqlite:///bot.db",
        ))
    }

    fn from_bound(bound: &BoundGroup) -> Result<Self, ConfigError> {
        Ok(Self {
            uri: bound.string("uri")?.to_string(),
        })
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Minimum level, case-insensitive (`LEVEL`)
    pub level: String,
    /// Output format: `full`, `compact` or `pretty` (`FORMAT`)
    pub format: String,
}

impl ConfigGroup for LoggingConfig {
    const NAME: &'static str = "Logging";

    fn schema() -> ConfigSchema {
        ConfigSchema::new(Self::NAME)
            .field(ConfigField::with_default("level", FieldType::String, "INFO"))
            .field(ConfigField::with_default("format", FieldType::String, "full"))
    }

    fn from_bound(bound: &BoundGroup) -> Result<Self, ConfigError> {
        Ok(Self {
            level: bound.string("level")?.to_string(),
            format: bound.string("format")?.to_string(),
        })
    }
}
