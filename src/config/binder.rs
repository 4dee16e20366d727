//! Bind configuration schemas from an environment-like source

use std::collections::HashMap;

use super::error::ConfigError;
use super::schema::{ConfigSchema, FieldType, Value};

/// Key/value lookup that configuration is bound from
pub trait EnvSource {
    /// Raw value for a key, if present
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Derive the environment key for a field name
///
/// An underscore is inserted before every uppercase letter that is not
/// the first character, then the whole name is uppercased:
/// `botToken` becomes `BOT_TOKEN`, `uri` becomes `URI`.
#[must_use]
pub fn env_key(field: &str) -> String {
    let mut key = String::with_capacity(field.len() + 4);
    for (i, c) in field.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            key.push('_');
        }
        key.extend(c.to_uppercase());
    }
    key
}

/// Coerce a raw string to a field type
///
/// Returns `None` when the raw value is not valid for the type. Booleans
/// never fail: unrecognised input is false.
#[must_use]
pub fn coerce(raw: &str, ty: FieldType) -> Option<Value> {
    match ty {
        FieldType::String => Some(Value::String(raw.to_string())),
        FieldType::Integer => raw.trim().parse::<i64>().ok().map(Value::Integer),
        FieldType::Boolean => {
            let lowered = raw.trim().to_lowercase();
            Some(Value::Boolean(matches!(
                lowered.as_str(),
                "true" | "1" | "yes" | "on"
            )))
        }
        FieldType::Float => raw.trim().parse::<f64>().ok().map(Value::Float),
    }
}

/// Bind every field of a schema from a source
///
/// Each field reads exactly one key. Missing keys fall back to the field's
/// default; a field with neither fails the whole bind.
///
/// # Errors
///
/// Returns `ConfigError::Missing` for a required field with no value, or
/// `ConfigError::Invalid` when a value cannot be coerced to its type
pub fn bind(schema: &ConfigSchema, source: &impl EnvSource) -> Result<BoundGroup, ConfigError> {
    let mut values = Vec::with_capacity(schema.fields.len());

    for field in &schema.fields {
        let key = env_key(field.name);

        let (raw, from_env) = match source.get(&key) {
            Some(raw) => (raw, true),
            None => match &field.default {
                Some(default) => (default.resolve(), false),
                None => {
                    return Err(ConfigError::Missing {
                        group: schema.group,
                        field: field.name,
                        key,
                    });
                }
            },
        };

        let Some(value) = coerce(&raw, field.ty) else {
            return Err(ConfigError::Invalid {
                group: schema.group,
                field: field.name,
                key,
                value: raw,
                expected: field.ty,
            });
        };

        tracing::debug!(
            group = schema.group,
            field = field.name,
            key = %key,
            from_env,
            "bound config field"
        );

        values.push((field.name, value));
    }

    Ok(BoundGroup {
        group: schema.group,
        values,
    })
}

/// Immutable result of binding one schema
///
/// Holds coerced values in schema order. Reading values never touches the
/// environment again.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundGroup {
    group: &'static str,
    values: Vec<(&'static str, Value)>,
}

impl BoundGroup {
    /// Group name
    #[must_use]
    pub const fn group(&self) -> &'static str {
        self.group
    }

    /// Raw coerced value for a field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    /// Number of bound fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the group has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read a string field
    ///
    /// # Errors
    ///
    /// Returns error if the field is unknown or not a string
    pub fn string(&self, field: &str) -> Result<&str, ConfigError> {
        match self.lookup(field)? {
            Value::String(s) => Ok(s),
            other => Err(self.wrong_type(field, FieldType::String, other)),
        }
    }

    /// Read an integer field
    ///
    /// # Errors
    ///
    /// Returns error if the field is unknown or not an integer
    pub fn integer(&self, field: &str) -> Result<i64, ConfigError> {
        match self.lookup(field)? {
            Value::Integer(n) => Ok(*n),
            other => Err(self.wrong_type(field, FieldType::Integer, other)),
        }
    }

    /// Read a boolean field
    ///
    /// # Errors
    ///
    /// Returns error if the field is unknown or not a boolean
    pub fn boolean(&self, field: &str) -> Result<bool, ConfigError> {
        match self.lookup(field)? {
            Value::Boolean(b) => Ok(*b),
            other => Err(self.wrong_type(field, FieldType::Boolean, other)),
        }
    }

    /// Read a float field
    ///
    /// # Errors
    ///
    /// Returns error if the field is unknown or not a float
    pub fn float(&self, field: &str) -> Result<f64, ConfigError> {
        match self.lookup(field)? {
            Value::Float(x) => Ok(*x),
            other => Err(self.wrong_type(field, FieldType::Float, other)),
        }
    }

    fn lookup(&self, field: &str) -> Result<&Value, ConfigError> {
        self.get(field).ok_or_else(|| ConfigError::UnknownField {
            group: self.group,
            field: field.to_string(),
        })
    }

    fn wrong_type(&self, field: &str, expected: FieldType, actual: &Value) -> ConfigError {
        ConfigError::WrongType {
            group: self.group,
            field: field.to_string(),
            expected,
            actual: actual.field_type(),
        }
    }
}
