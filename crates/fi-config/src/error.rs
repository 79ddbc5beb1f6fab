//! Configuration errors and the validation trait.

use std::fmt;

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures while reading, writing or checking a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One setting is out of range.
    #[error("invalid setting {0}")]
    Validation(ValidationError),

    /// Several settings are out of range.
    #[error("{} invalid settings: {}", .0.len(), join(.0))]
    MultipleValidationErrors(Vec<ValidationError>),

    /// Rendering the configuration as text failed.
    #[error("cannot serialize configuration: {0}")]
    Serialization(String),

    /// The text is not a well-formed configuration.
    #[error("cannot parse configuration: {0}")]
    Deserialization(String),

    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Reading or writing a configuration file failed.
    #[error("configuration file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Vec<ValidationError>> for ConfigError {
    fn from(mut errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            Self::Validation(errors.remove(0))
        } else {
            Self::MultipleValidationErrors(errors)
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Serialization(err.to_string())
        } else {
            Self::Deserialization(err.to_string())
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Deserialization(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One out-of-range setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the setting, e.g. `pricing.max_iterations`.
    pub field: String,
    /// What is wrong with the value.
    pub message: String,
    /// Short name of the violated rule.
    pub rule: &'static str,
}

impl ValidationError {
    /// Creates a validation error for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>, rule: &'static str) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule,
        }
    }

    /// Prefixes the field with its section name.
    #[must_use]
    pub fn in_section(mut self, section: &str) -> Self {
        self.field = format!("{section}.{}", self.field);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.field, self.message, self.rule)
    }
}

/// Range checks for a configuration section.
pub trait Validate {
    /// Every violated rule; empty when the section is usable.
    fn validate(&self) -> Vec<ValidationError>;

    /// True when [`validate`](Self::validate) finds nothing.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// [`validate`](Self::validate) folded into a `Result`.
    ///
    /// # Errors
    ///
    /// `Validation` for a single violation, `MultipleValidationErrors` otherwise.
    fn validate_or_error(&self) -> ConfigResult<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }
}
