//! Session configuration errors

use thiserror::Error;

/// Errors raised while reading, checking or writing a session file
#[derive(Debug, Error)]
pub enum ContractError {
    /// Session file content is not valid for its format
    #[error("{format} parse error: {message}")]
    ConfigParse {
        format: &'static str,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Session could not be written out
    #[error("{format} serialize error: {message}")]
    ConfigSerialize {
        format: &'static str,
        message: String,
    },

    /// File extension names no known format
    #[error("unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    /// A value is out of range or inconsistent with the rest of the session
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Parse failure carrying the underlying parser error
    pub fn config_parse<E>(format: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigParse {
            format,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    pub fn config_serialize(format: &'static str, message: impl ToString) -> Self {
        Self::ConfigSerialize {
            format,
            message: message.to_string(),
        }
    }

    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Validation failure at a dotted field path such as `series[1].name`
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Field path of a validation failure
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ConfigValidation { field, .. } => Some(field),
            _ => None,
        }
    }
}
