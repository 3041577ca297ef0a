//! Error types for ember_field

use thiserror::Error;

/// Errors raised while building or reconfiguring a particle field
#[derive(Error, Debug)]
pub enum FieldError {
    /// Options failed validation; no field was built
    #[error("Invalid field configuration: {0}")]
    InvalidConfiguration(String),

    /// Options document could not be parsed
    #[error("Failed to parse options: {0}")]
    Parse(#[from] toml::de::Error),

    /// Options could not be written back out
    #[error("Failed to serialize options: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl FieldError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        FieldError::InvalidConfiguration(msg.into())
    }
}

/// Result type for ember_field operations
pub type Result<T> = std::result::Result<T, FieldError>;
