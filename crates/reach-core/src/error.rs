//! Error types for reachinbox.

use thiserror::Error;

/// Result type alias using reachinbox's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for reachinbox operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session store error (load/save/clear of the local session file)
    #[error("Session error: {0}")]
    Session(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing backend URL".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing backend URL");
    }

    #[test]
    fn test_error_display_session() {
        let err = Error::Session("corrupt session file".to_string());
        assert_eq!(err.to_string(), "Session error: corrupt session file");
    }

    #[test]
    fn test_error_display_request() {
        let err = Error::Request("connection refused".to_string());
        assert_eq!(err.to_string(), "Request error: connection refused");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("empty password".to_string());
        assert_eq!(err.to_string(), "Invalid input: empty password");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
