//! Error types for the Do-Flow services

use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Error, Debug)]
pub enum ServiceError {

    // =============================
    // Request Errors
    // =============================

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Conflict(String),

    // =============================
    // Internal Errors
    // =============================

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token error: {0}")]
    Token(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ServiceError {
    /// True for errors caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_)
                | ServiceError::NotFound(_)
                | ServiceError::Auth(_)
                | ServiceError::Conflict(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(ServiceError::Validation("x".into()).is_client_error());
        assert!(ServiceError::NotFound("x".into()).is_client_error());
        assert!(!ServiceError::Token("x".into()).is_client_error());
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "taken");
        assert!(!ServiceError::from(io).is_client_error());
    }

    #[test]
    fn test_display_keeps_message() {
        let err = ServiceError::Validation("Message cannot be empty".into());
        assert_eq!(err.to_string(), "Message cannot be empty");
    }
}
