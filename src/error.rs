//! Error handling for the HCL recipe
//!
//! Provides the crate's error type using thiserror. Resolution itself has a
//! single failure mode, `ConfigurationConflict`; the other variants cover
//! selection parsing and config file handling around it.

use thiserror::Error;

/// Main error type for recipe resolution
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Mutually exclusive variants were enabled together. The message is the
    /// triggering conflict rule's diagnostic, verbatim.
    #[error("Configuration conflict: {0}")]
    ConfigurationConflict(String),

    /// A variant selection string could not be parsed
    #[error("Invalid variant selection: {0}")]
    InvalidSelection(String),

    /// Build configuration errors (bad prefix, unusable values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors (config file read/write)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for recipe operations
pub type Result<T> = std::result::Result<T, RecipeError>;

impl RecipeError {
    /// Create a configuration conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::ConfigurationConflict(msg.into())
    }

    /// Create an invalid selection error
    pub fn invalid_selection(msg: impl Into<String>) -> Self {
        Self::InvalidSelection(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The diagnostic of a conflict, if this is one
    pub fn conflict_message(&self) -> Option<&str> {
        match self {
            Self::ConfigurationConflict(msg) => Some(msg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RecipeError::conflict("RPC lib only supports tcp protocol");
        assert_eq!(
            err.to_string(),
            "Configuration conflict: RPC lib only supports tcp protocol"
        );

        let err = RecipeError::invalid_selection("'+' without a name");
        assert_eq!(err.to_string(), "Invalid variant selection: '+' without a name");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RecipeError = io_err.into();
        assert!(matches!(err, RecipeError::Io(_)));
    }

    #[test]
    fn test_conflict_message() {
        let err = RecipeError::conflict("no");
        assert_eq!(err.conflict_message(), Some("no"));
        assert!(RecipeError::config("bad prefix").conflict_message().is_none());
    }
}
