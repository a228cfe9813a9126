//! Error types for the lodgings service

use hyper::StatusCode;

/// Main error type for lodgings operations
#[derive(Debug, thiserror::Error)]
pub enum LodgingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LodgingError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message carried by the error, without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::Store(msg)
            | Self::Config(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

impl From<std::io::Error> for LodgingError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result type alias for lodgings operations
pub type Result<T> = std::result::Result<T, LodgingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            LodgingError::Validation("missing name".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LodgingError::NotFound("/lodgings/9".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            LodgingError::Store("connection refused".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_strips_prefix() {
        let err = LodgingError::Validation("missing name".into());
        assert_eq!(err.to_string(), "Validation error: missing name");
        assert_eq!(err.message(), "missing name");
    }

    #[test]
    fn test_io_error_is_internal() {
        let err: LodgingError =
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken").into();
        assert!(matches!(err, LodgingError::Internal(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
