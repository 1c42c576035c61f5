// src/error.rs
//! Application error types with structured error handling.
//!
//! Each variant names a failure mode of the blog: a post that does not
//! exist, a record the normalizer cannot read, a date that cannot be shown,
//! a listing used out of order, or a content source that cannot be reached.

use std::fmt;
use thiserror::Error;

/// Content API failures as a typed vocabulary, classified from the HTTP
/// status of an unsuccessful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentErrorCode {
    /// The request parameters (query, ref, page) were rejected
    BadRequest,
    /// The access token is missing, invalid or expired
    Unauthorized,
    /// The token lacks permission for this repository or release
    Forbidden,
    /// The repository or endpoint does not exist
    NotFound,
    /// API rate limit exceeded, back off and retry
    RateLimited,
    /// The API failed internally or is temporarily unavailable
    ServerError,
    /// Any other status
    HttpStatus(u16),
}

impl ContentErrorCode {
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            other => Self::HttpStatus(other),
        }
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ServerError)
    }
}

impl fmt::Display for ContentErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest => write!(f, "bad_request"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound => write!(f, "not_found"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ServerError => write!(f, "server_error"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("No post found with uid '{uid}'")]
    NotFound { uid: String },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid publication date: {0}")]
    InvalidDate(String),

    #[error("The listing has no further pages")]
    AlreadyExhausted,

    #[error("The listing has not been loaded yet, there is no cursor to follow")]
    NoCursorAvailable,

    #[error("The listing has already been loaded")]
    ListingAlreadyLoaded,

    #[error("Content source unavailable: {0}")]
    SourceUnavailable(#[from] reqwest::Error),

    #[error("Content API returned an error ({code}): {message}")]
    ContentService {
        code: ContentErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template render error for template {name}: {message}")]
    TemplateRenderError { name: String, message: String },

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Whether a failed request is worth repeating.
    ///
    /// Transport failures other than malformed requests and the API's
    /// rate-limit and server-side statuses are transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::SourceUnavailable(e) => !e.is_builder() && !e.is_decode(),
            AppError::ContentService { code, .. } => code.is_retryable(),
            _ => false,
        }
    }

    /// Whether the error means the requested post does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }
}

// Allow converting from anyhow::Error, preserving the message
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: err.to_string(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(ContentErrorCode::from_http_status(401), ContentErrorCode::Unauthorized);
        assert_eq!(ContentErrorCode::from_http_status(503), ContentErrorCode::ServerError);
        assert_eq!(ContentErrorCode::from_http_status(418), ContentErrorCode::HttpStatus(418));
        assert!(ContentErrorCode::RateLimited.is_retryable());
        assert!(!ContentErrorCode::Unauthorized.is_retryable());
    }

    #[test]
    fn content_service_errors_are_retryable_by_code() {
        let transient = AppError::ContentService {
            code: ContentErrorCode::ServerError,
            message: "HTTP 502".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        assert!(transient.is_retryable());

        let permanent = AppError::ContentService {
            code: ContentErrorCode::Forbidden,
            message: "HTTP 403".to_string(),
            status: reqwest::StatusCode::FORBIDDEN,
        };
        assert!(!permanent.is_retryable());
        assert!(!AppError::NotFound { uid: "x".into() }.is_retryable());
    }

    #[test]
    fn error_messages() {
        let err = AppError::NotFound {
            uid: "missing-slug".to_string(),
        };
        assert_eq!(err.to_string(), "No post found with uid 'missing-slug'");
        assert!(err.is_not_found());
        assert_eq!(
            AppError::AlreadyExhausted.to_string(),
            "The listing has no further pages"
        );
    }
}
