//! Error types for the trading journal.

use thiserror::Error;

/// Result type alias using the journal's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for journal operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Chart entry not found
    #[error("Chart not found: {0}")]
    ChartNotFound(String),

    /// Strategy not found
    #[error("Strategy not found: {0}")]
    StrategyNotFound(uuid::Uuid),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A record with the same unique key already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// External attachment storage rejected an operation
    #[error("Attachment storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for any of the not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::ChartNotFound(_) | Error::StrategyNotFound(_)
        )
    }
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
    use uuid::Uuid;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("test resource".to_string());
        assert_eq!(err.to_string(), "Not found: test resource");
    }

    #[test]
    fn test_error_display_chart_not_found() {
        let err = Error::ChartNotFound("abc123".to_string());
        assert_eq!(err.to_string(), "Chart not found: abc123");
    }

    #[test]
    fn test_error_display_strategy_not_found() {
        let id = Uuid::nil();
        let err = Error::StrategyNotFound(id);
        assert_eq!(err.to_string(), format!("Strategy not found: {}", id));
    }

    #[test]
    fn test_error_display_conflict() {
        let err = Error::Conflict("Strategy with this value already exists".to_string());
        assert_eq!(
            err.to_string(),
            "Conflict: Strategy with this value already exists"
        );
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("Missing required fields".to_string());
        assert_eq!(err.to_string(), "Invalid input: Missing required fields");
    }

    #[test]
    fn test_error_display_storage() {
        let err = Error::Storage("401 Unauthorized".to_string());
        assert_eq!(err.to_string(), "Attachment storage error: 401 Unauthorized");
    }

    #[test]
    fn test_is_not_found_covers_all_variants() {
        assert!(Error::NotFound("x".into()).is_not_found());
        assert!(Error::ChartNotFound("x".into()).is_not_found());
        assert!(Error::StrategyNotFound(Uuid::nil()).is_not_found());
        assert!(!Error::Internal("x".into()).is_not_found());
        assert!(!Error::Conflict("x".into()).is_not_found());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
