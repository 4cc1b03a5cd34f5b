//! Shared error type across latsim crates.

use thiserror::Error;

/// Stable error codes used in logs and by callers that match on error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Configuration failed to parse or validate.
    InvalidConfig,
    /// Unsupported configuration version.
    UnsupportedVersion,
    /// A metric family name was registered twice.
    DuplicateFamily,
    /// Metric name does not follow the exposition naming rules.
    InvalidMetricName,
    /// Label name does not follow the exposition naming rules.
    InvalidLabelName,
    /// Histogram bucket bounds are empty or not strictly increasing.
    InvalidBuckets,
    /// Socket or file I/O failed.
    Io,
}

impl ErrorCode {
    /// String representation used in structured logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::DuplicateFamily => "DUPLICATE_FAMILY",
            ErrorCode::InvalidMetricName => "INVALID_METRIC_NAME",
            ErrorCode::InvalidLabelName => "INVALID_LABEL_NAME",
            ErrorCode::InvalidBuckets => "INVALID_BUCKETS",
            ErrorCode::Io => "IO",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, LatSimError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum LatSimError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("metric family already registered: {0}")]
    DuplicateFamily(String),
    #[error("invalid metric name: {0:?}")]
    InvalidMetricName(String),
    #[error("invalid label name: {0:?}")]
    InvalidLabelName(String),
    #[error("invalid buckets: {0}")]
    InvalidBuckets(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl LatSimError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            LatSimError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            LatSimError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            LatSimError::DuplicateFamily(_) => ErrorCode::DuplicateFamily,
            LatSimError::InvalidMetricName(_) => ErrorCode::InvalidMetricName,
            LatSimError::InvalidLabelName(_) => ErrorCode::InvalidLabelName,
            LatSimError::InvalidBuckets(_) => ErrorCode::InvalidBuckets,
            LatSimError::Io(_) => ErrorCode::Io,
        }
    }
}
