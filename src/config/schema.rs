//! Statically declared configuration schemas
//!
//! A [`ConfigSchema`] is an ordered list of [`ConfigField`] descriptors
//! belonging to one named group. Schemas carry no values; binding them
//! against an environment source produces a [`super::BoundGroup`].

use std::fmt;

/// Semantic type of a configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Passed through unchanged
    String,
    /// Base-10 signed integer
    Integer,
    /// `true`, `1`, `yes` or `on` (case-insensitive); anything else is false
    Boolean,
    /// Decimal floating point
    Float,
}

impl FieldType {
    /// Lowercase name used in error messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Float => "float",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default used when the environment has no entry for a field
///
/// Defaults are raw strings and go through the same coercion as
/// environment values.
#[derive(Clone, Copy)]
pub enum FieldDefault {
    /// Fixed value
    Literal(&'static str),
    /// Computed on every bind, never cached
    Computed(fn() -> String),
}

impl FieldDefault {
    /// Produce the raw default value
    #[must_use]
    pub fn resolve(&self) -> String {
        match self {
            Self::Literal(value) => (*value).to_string(),
            Self::Computed(compute) => compute(),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Descriptor for a single configuration field
#[derive(Debug, Clone, Copy)]
pub struct ConfigField {
    /// Field name (e.g. `botToken`); the environment key is derived from it
    pub name: &'static str,
    /// Semantic type used for coercion
    pub ty: FieldType,
    /// Fallback when the environment has no entry
    pub default: Option<FieldDefault>,
}

impl ConfigField {
    /// Required field with no default
    #[must_use]
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            default: None,
        }
    }

    /// Field with a fixed default
    #[must_use]
    pub const fn with_default(name: &'static str, ty: FieldType, default: &'static str) -> Self {
        Self {
            name,
            ty,
            default: Some(FieldDefault::Literal(default)),
        }
    }

    /// Field whose default is computed lazily on each bind
    #[must_use]
    pub const fn with_computed(name: &'static str, ty: FieldType, default: fn() -> String) -> Self {
        Self {
            name,
            ty,
            default: Some(FieldDefault::Computed(default)),
        }
    }

    /// Whether binding fails when the environment has no entry
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Ordered set of fields sharing a namespace (e.g. "Telegram")
#[derive(Debug, Clone)]
pub struct ConfigSchema {
    /// Group name
    pub group: &'static str,
    /// Fields in declaration order
    pub fields: Vec<ConfigField>,
}

impl ConfigSchema {
    /// Create an empty schema for a group
    #[must_use]
    pub const fn new(group: &'static str) -> Self {
        Self {
            group,
            fields: Vec::new(),
        }
    }

    /// Append a field
    #[must_use]
    pub fn field(mut self, field: ConfigField) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field descriptor by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConfigField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A coerced configuration value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String value
    String(String),
    /// Integer value
    Integer(i64),
    /// Boolean value
    Boolean(bool),
    /// Float value
    Float(f64),
}

impl Value {
    /// Semantic type of this value
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::String(_) => FieldType::String,
            Self::Integer(_) => FieldType::Integer,
            Self::Boolean(_) => FieldType::Boolean,
            Self::Float(_) => FieldType::Float,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_without_default() {
        let field = ConfigField::required("botToken", FieldType::String);
        assert!(field.is_required());

        let field = ConfigField::with_default("uri", FieldType::String, "sqlite:///bot.db");
        assert!(!field.is_required());
    }

    #[test]
    fn computed_default_runs_each_time() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static CALLS: AtomicUsize = AtomicUsize::new(0);
        fn next() -> String {
            CALLS.fetch_add(1, Ordering::SeqCst).to_string()
        }

        let default = FieldDefault::Computed(next);
        let first = default.resolve();
        let second = default.resolve();
        assert_ne!(first, second);
    }

    #[test]
    fn schema_preserves_order() {
        let schema = ConfigSchema::new("Logging")
            .field(ConfigField::with_default("level", FieldType::String, "INFO"))
            .field(ConfigField::with_default("format", FieldType::String, "full"));

        let names: Vec<_> = schema.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["level", "format"]);
        assert!(schema.get("format").is_some());
        assert!(schema.get("missing").is_none());
    }
}
