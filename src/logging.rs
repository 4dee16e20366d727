//! Tracing subscriber setup

use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Default single-line format with target
    Full,
    /// Abbreviated single-line format
    Compact,
    /// Multi-line human-friendly format
    Pretty,
}

impl LogFormat {
    /// Parse from a config value, case-insensitive
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "full" => Some(Self::Full),
            "compact" => Some(Self::Compact),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Parse a configured level name
///
/// Accepts tracing level names plus the `WARNING`, `CRITICAL` and `FATAL`
/// spellings found in existing `.env` files.
#[must_use]
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    let lowered = level.trim().to_lowercase();
    let name = match lowered.as_str() {
        "" => return None,
        "warning" => "warn",
        "critical" | "fatal" => "error",
        other => other,
    };
    LevelFilter::from_str(name).ok()
}

/// Build the filter directive for a configured level and `-v` count
///
/// Verbosity flags override the configured level. An unknown level
/// becomes `info`.
#[must_use]
pub fn filter_directive(level: &str, verbose: u8) -> String {
    match verbose {
        0 => parse_level(level).unwrap_or(LevelFilter::INFO).to_string(),
        1 => "info,plugbot=debug".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level when set. An
/// unparsable level falls back to `info`.
pub fn init(config: &LoggingConfig, verbose: u8) {
    let directive = filter_directive(&config.level, verbose);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format = LogFormat::parse(&config.format);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format.unwrap_or(LogFormat::Full) {
        LogFormat::Full => builder.init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }

    if verbose == 0 && parse_level(&config.level).is_none() {
        tracing::warn!(level = %config.level, "unknown log level, using info");
    }

    if format.is_none() {
        tracing::warn!(format = %config.format, "unknown log format, using full");
    }
}

/// Install a plain `info` subscriber for reporting startup failures
pub fn init_fallback() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info"))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("INFO", 0), "info");
        assert_eq!(filter_directive("Warn ", 0), "warn");
        assert_eq!(filter_directive("INFO", 1), "info,plugbot=debug");
        assert_eq!(filter_directive("INFO", 3), "trace");
    }

    #[test]
    fn test_python_level_names() {
        assert_eq!(filter_directive("WARNING", 0), "warn");
        assert_eq!(filter_directive("CRITICAL", 0), "error");
        assert_eq!(filter_directive("fatal", 0), "error");
        assert_eq!(parse_level("Debug"), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        assert_eq!(parse_level("verbose"), None);
        assert_eq!(parse_level(""), None);
        assert_eq!(filter_directive("verbose", 0), "info");
        assert_eq!(filter_directive("  ", 0), "info");
    }

    #[test]
    fn test_directive_is_a_level_not_a_target() {
        let filter = EnvFilter::try_new(filter_directive("WARNING", 0)).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_log_format() {
        assert_eq!(LogFormat::parse("Compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse("json"), None);
    }
}
