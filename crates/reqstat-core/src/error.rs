//! Shared error type across reqstat crates.

use thiserror::Error;

/// Stable error codes (used in logs, HTTP error bodies and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// No registered route matches the request.
    RouteNotFound,
    /// Tag token contains reserved characters.
    InvalidTag,
    /// Metric name is empty or contains reserved characters.
    InvalidMetricName,
    /// Configuration rejected.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Metrics transport failed.
    Transport,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and error bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::RouteNotFound => "ROUTE_NOT_FOUND",
            ErrorCode::InvalidTag => "INVALID_TAG",
            ErrorCode::InvalidMetricName => "INVALID_METRIC_NAME",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ReqstatError>;

/// Unified error type used by core and web.
#[derive(Debug, Error)]
pub enum ReqstatError {
    #[error("no route for {method} {path}")]
    RouteNotFound { method: String, path: String },
    #[error("invalid tag: {0}")]
    InvalidTag(String),
    #[error("invalid metric name: {0}")]
    InvalidMetricName(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("metrics transport: {0}")]
    Transport(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ReqstatError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ReqstatError::RouteNotFound { .. } => ErrorCode::RouteNotFound,
            ReqstatError::InvalidTag(_) => ErrorCode::InvalidTag,
            ReqstatError::InvalidMetricName(_) => ErrorCode::InvalidMetricName,
            ReqstatError::BadConfig(_) => ErrorCode::BadConfig,
            ReqstatError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            ReqstatError::Transport(_) => ErrorCode::Transport,
            ReqstatError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// True for the single recoverable naming failure.
    pub fn is_route_not_found(&self) -> bool {
        matches!(self, ReqstatError::RouteNotFound { .. })
    }
}

impl From<std::io::Error> for ReqstatError {
    fn from(e: std::io::Error) -> Self {
        ReqstatError::Transport(e.to_string())
    }
}
