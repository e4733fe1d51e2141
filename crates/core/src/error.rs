//! Unified error types for inkwell.
//!
//! A missing single item is not an error: lookups return `Option`.

/// Unified error types for the data-access layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (connection refused, timeout, 5xx).
    ///
    /// Retried only at the caller's discretion.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// The remote API rejected the request. Messages are kept verbatim.
    #[error("VALIDATION_ERROR: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The response could not be decoded into the expected shape.
    #[error("DECODE_ERROR: {0}")]
    Decode(String),

    /// Invalid input parameters supplied by the caller.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Whether a caller may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    /// Short machine-readable code, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Network(_) => "NETWORK_ERROR",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Decode(_) => "DECODE_ERROR",
            Error::InvalidInput(_) => "INVALID_INPUT",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Network("connection refused".to_string());
        assert!(err.to_string().contains("NETWORK_ERROR"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_validation_messages_verbatim() {
        let err = Error::Validation(vec!["name is required".into(), "slug taken".into()]);
        assert_eq!(err.to_string(), "VALIDATION_ERROR: name is required; slug taken");
    }

    #[test]
    fn test_only_network_is_retryable() {
        assert!(Error::Network("x".into()).is_retryable());
        assert!(!Error::Validation(vec![]).is_retryable());
        assert!(!Error::Decode("x".into()).is_retryable());
        assert!(!Error::InvalidInput("x".into()).is_retryable());
    }

    #[test]
    fn test_decode_from_serde() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.code(), "DECODE_ERROR");
    }
}
