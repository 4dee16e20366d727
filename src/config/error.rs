//! Configuration errors
//!
//! Every variant is fatal at startup: the process reports it and exits
//! before plugins are loaded or the network is touched.

use thiserror::Error;

use super::schema::FieldType;

/// Errors raised while binding or reading configuration groups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Required field with neither an environment value nor a default
    #[error("{group}.{field}: required, set the {key} environment variable")]
    Missing {
        /// Group name
        group: &'static str,
        /// Field name
        field: &'static str,
        /// Environment key the field is read from
        key: String,
    },

    /// Raw value could not be coerced to the field's type
    #[error("{group}.{field}: invalid {expected} value {value:?} in {key}")]
    Invalid {
        /// Group name
        group: &'static str,
        /// Field name
        field: &'static str,
        /// Environment key the value came from
        key: String,
        /// Offending raw value
        value: String,
        /// Declared type
        expected: FieldType,
    },

    /// Accessor asked for a type the schema does not declare
    #[error("{group}.{field}: declared as {actual}, read as {expected}")]
    WrongType {
        /// Group name
        group: &'static str,
        /// Field name
        field: String,
        /// Type requested by the accessor
        expected: FieldType,
        /// Type declared in the schema
        actual: FieldType,
    },

    /// Accessor named a field the schema does not declare
    #[error("{group}.{field}: no such field")]
    UnknownField {
        /// Group name
        group: &'static str,
        /// Field name
        field: String,
    },
}

impl ConfigError {
    /// Name of the field this error refers to
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field, .. } | Self::Invalid { field, .. } => *field,
            Self::WrongType { field, .. } | Self::UnknownField { field, .. } => field.as_str(),
        }
    }
}
