//! Error types for Mdchat
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Mdchat operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, media encoding, and gateway interactions.
#[derive(Error, Debug)]
pub enum MdchatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Media codec errors (unreadable local image file, malformed payload)
    #[error("Codec error: {0}")]
    Codec(String),

    /// Gateway errors (transport failure, empty or incomplete response)
    #[error("Gateway error: {reason}")]
    Gateway {
        /// Upstream error message or normalization failure reason
        reason: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl MdchatError {
    /// Create a gateway error from a failure reason
    ///
    /// # Examples
    ///
    /// ```
    /// use mdchat::error::MdchatError;
    ///
    /// let error = MdchatError::gateway("empty response");
    /// assert_eq!(error.to_string(), "Gateway error: empty response");
    /// ```
    pub fn gateway(reason: impl Into<String>) -> Self {
        Self::Gateway {
            reason: reason.into(),
        }
    }
}

/// Result type alias for Mdchat operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = MdchatError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_codec_error_display() {
        let error = MdchatError::Codec("unreadable file".to_string());
        assert_eq!(error.to_string(), "Codec error: unreadable file");
    }

    #[test]
    fn test_gateway_error_display() {
        let error = MdchatError::gateway("no image in response");
        assert_eq!(error.to_string(), "Gateway error: no image in response");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: MdchatError = io_error.into();
        assert!(matches!(error, MdchatError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_str = "{invalid json}";
        let json_error = serde_json::from_str::<serde_json::Value>(json_str).unwrap_err();
        let error: MdchatError = json_error.into();
        assert!(matches!(error, MdchatError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_str = "invalid: : yaml";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: MdchatError = yaml_error.into();
        assert!(matches!(error, MdchatError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MdchatError>();
    }
}
