//! Configuration binding tests

use plugbot::config::{
    ConfigField, ConfigSchema, DatabaseConfig, FieldType, LoggingConfig, TelegramConfig, bind,
};
use plugbot::{Config, ConfigError, ConfigGroup, bind_group};

mod common;
use common::env;

#[test]
fn default_used_when_env_missing() {
    let schema = ConfigSchema::new("Tuning")
        .field(ConfigField::with_default("retries", FieldType::Integer, "3"))
        .field(ConfigField::with_default("ratio", FieldType::Float, "0.5"))
        .field(ConfigField::with_default("verbose", FieldType::Boolean, "on"))
        .field(ConfigField::with_default("label", FieldType::String, "default"));

    let bound = bind(&schema, &env(&[])).unwrap();

    assert_eq!(bound.integer("retries").unwrap(), 3);
    assert!((bound.float("ratio").unwrap() - 0.5).abs() < f64::EPSILON);
    assert!(bound.boolean("verbose").unwrap());
    assert_eq!(bound.string("label").unwrap(), "default");
}

#[test]
fn boolean_values() {
    let schema =
        ConfigSchema::new("Flags").field(ConfigField::required("featureFlag", FieldType::Boolean));

    for value in ["true", "TRUE", "1", "yes", "On"] {
        let bound = bind(&schema, &env(&[("FEATURE_FLAG", value)])).unwrap();
        assert!(bound.boolean("featureFlag").unwrap(), "{value} should be true");
    }

    for value in ["false", "0", "no", "off", "enabled", "2"] {
        let bound = bind(&schema, &env(&[("FEATURE_FLAG", value)])).unwrap();
        assert!(!bound.boolean("featureFlag").unwrap(), "{value} should be false");
    }
}

#[test]
fn required_field_missing_names_field() {
    let schema = ConfigSchema::new("Service")
        .field(ConfigField::with_default("host", FieldType::String, "localhost"))
        .field(ConfigField::required("apiKey", FieldType::String));

    let err = bind(&schema, &env(&[])).unwrap_err();

    assert_eq!(
        err,
        ConfigError::Missing {
            group: "Service",
            field: "apiKey",
            key: "API_KEY".to_string(),
        }
    );
    assert!(err.to_string().contains("apiKey"));
}

#[test]
fn invalid_values_fail() {
    let schema = ConfigSchema::new("Service")
        .field(ConfigField::required("port", FieldType::Integer))
        .field(ConfigField::with_default("ratio", FieldType::Float, "1.0"));

    let err = bind(&schema, &env(&[("PORT", "eighty")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "port", .. }));

    let err = bind(&schema, &env(&[("PORT", "80"), ("RATIO", "half")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "ratio", .. }));
}

#[test]
fn computed_default_evaluated_per_bind() {
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);
    fn next_id() -> String {
        (COUNTER.fetch_add(1, Ordering::SeqCst) + 100).to_string()
    }

    let schema = ConfigSchema::new("Instance")
        .field(ConfigField::with_computed("instanceId", FieldType::Integer, next_id));

    let first = bind(&schema, &env(&[])).unwrap().integer("instanceId").unwrap();
    let second = bind(&schema, &env(&[])).unwrap().integer("instanceId").unwrap();
    assert_ne!(first, second);

    let overridden = bind(&schema, &env(&[("INSTANCE_ID", "7")])).unwrap();
    assert_eq!(overridden.integer("instanceId").unwrap(), 7);
}

#[test]
fn source_is_read_once_per_field() {
    use std::cell::RefCell;

    let reads = RefCell::new(Vec::new());
    let source = |key: &str| {
        reads.borrow_mut().push(key.to_string());
        (key == "BOT_TOKEN").then(|| "token".to_string())
    };

    let bound = bind(&TelegramConfig::schema(), &source).unwrap();
    assert_eq!(bound.len(), 3);
    assert_eq!(
        *reads.borrow(),
        vec!["BOT_TOKEN", "PARSE_MODE", "POLL_TIMEOUT"]
    );
}

#[test]
fn full_config_binds_all_groups() {
    let config = Config::from_source(&env(&[
        ("BOT_TOKEN", "123:abc"),
        ("URI", "postgres://localhost/bot"),
        ("LEVEL", "DEBUG"),
        ("POLL_TIMEOUT", "50"),
    ]))
    .unwrap();

    assert_eq!(config.telegram.poll_timeout, 50);
    assert_eq!(
        config.database,
        DatabaseConfig {
            uri: "postgres://localhost/bot".to_string()
        }
    );
    assert_eq!(
        config.logging,
        LoggingConfig {
            level: "DEBUG".to_string(),
            format: "full".to_string(),
        }
    );
}

#[test]
fn missing_token_is_fatal() {
    let err = Config::from_source(&env(&[("URI", "sqlite:///x.db")])).unwrap_err();
    assert_eq!(err.field(), "botToken");

    let err = bind_group::<TelegramConfig>(&env(&[("BOT_TOKEN", "t"), ("POLL_TIMEOUT", "x")]))
        .unwrap_err();
    assert_eq!(err.field(), "pollTimeout");
}
