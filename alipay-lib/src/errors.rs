//! Error types for Alipay gateway operations.
//!
//! Every failure of the signing and verification protocol surfaces as a
//! distinct [`AlipayError`] variant so callers can tell a bad key file from
//! a network hiccup from a forged response.
//!
//! Gateway-reported business failures ("trade not found", "insufficient
//! balance") are *not* errors here: they arrive as verified payloads whose
//! [`ResponseStatus`](crate::trade::ResponseStatus) carries the outcome.

use std::fmt;

/// Error codes for FFI and log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum AlipayErrorCode {
    /// Feature not compiled in
    Unimplemented = 1000,
    /// Transport/network layer error
    Transport = 2000,
    /// Connection failed
    ConnectionFailed = 2001,
    /// Connection timeout
    ConnectionTimeout = 2002,
    /// Unusable key material or configuration
    Configuration = 3000,
    /// Signature missing, malformed or mismatched
    Verification = 3001,
    /// Signing the canonical string failed
    Signing = 3002,
    /// Invalid request parameter
    InvalidData = 5000,
    /// Serialization error
    Serialization = 5002,
    /// Response did not follow the gateway protocol
    Protocol = 6000,
}

/// Failures while loading RSA key material.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("failed to read key file {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("key is not valid base64: {0}")]
    Base64(String),
    #[error("unsupported PEM label: {0}")]
    UnsupportedLabel(String),
    #[error("failed to parse {kind} key: {reason}")]
    Parse { kind: &'static str, reason: String },
}

/// Comprehensive error type for gateway operations.
#[derive(Debug)]
pub enum AlipayError {
    /// Feature not compiled in.
    Unimplemented(&'static str),

    /// Key material or configuration is unusable. Raised at construction
    /// time only, never by a per-call operation.
    Configuration(String),

    /// A key failed to load.
    Key(KeyError),

    /// The business payload could not be encoded, or a verified payload could
    /// not be decoded into the requested type.
    Serialization(String),

    /// Signing the canonical string failed.
    Signing(String),

    /// Transport/network layer error.
    Transport(String),

    /// Connection failed.
    ConnectionFailed {
        /// Target endpoint
        target: String,
        /// Underlying error message
        reason: String,
    },

    /// Connection timeout.
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Signature missing where required, malformed, or not matching.
    ///
    /// The data that failed verification is never attached.
    Verification(String),

    /// The response lacks a recognizable business-result field or is not
    /// a JSON object.
    Protocol(String),

    /// Invalid request parameter.
    InvalidData {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

impl AlipayError {
    /// Get the error code for FFI/logging.
    pub fn code(&self) -> AlipayErrorCode {
        match self {
            Self::Unimplemented(_) => AlipayErrorCode::Unimplemented,
            Self::Configuration(_) | Self::Key(_) => AlipayErrorCode::Configuration,
            Self::Serialization(_) => AlipayErrorCode::Serialization,
            Self::Signing(_) => AlipayErrorCode::Signing,
            Self::Transport(_) => AlipayErrorCode::Transport,
            Self::ConnectionFailed { .. } => AlipayErrorCode::ConnectionFailed,
            Self::ConnectionTimeout { .. } => AlipayErrorCode::ConnectionTimeout,
            Self::Verification(_) => AlipayErrorCode::Verification,
            Self::Protocol(_) => AlipayErrorCode::Protocol,
            Self::InvalidData { .. } => AlipayErrorCode::InvalidData,
        }
    }

    /// Returns true if this error is potentially recoverable by retrying.
    ///
    /// The client never retries on its own; this is advice for the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::ConnectionFailed { .. } | Self::ConnectionTimeout { .. }
        )
    }

    /// Returns a suggested retry delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::ConnectionTimeout { .. } => Some(1000),
            Self::ConnectionFailed { .. } => Some(2000),
            Self::Transport(_) => Some(1000),
            _ => None,
        }
    }

    /// Returns true if this is a signature verification failure.
    pub fn is_verification(&self) -> bool {
        matches!(self, Self::Verification(_))
    }

    /// Create an invalid data error.
    pub fn invalid_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AlipayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unimplemented(label) => write!(f, "{} is not implemented", label),
            Self::Configuration(msg) => write!(f, "configuration error: {}", msg),
            Self::Key(err) => write!(f, "configuration error: {}", err),
            Self::Serialization(msg) => write!(f, "serialization error: {}", msg),
            Self::Signing(msg) => write!(f, "signing failed: {}", msg),
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::ConnectionFailed { target, reason } => {
                write!(f, "connection to {} failed: {}", target, reason)
            }
            Self::ConnectionTimeout {
                operation,
                timeout_ms,
            } => {
                write!(f, "{} timed out after {}ms", operation, timeout_ms)
            }
            Self::Verification(msg) => write!(f, "signature verification failed: {}", msg),
            Self::Protocol(msg) => write!(f, "protocol error: {}", msg),
            Self::InvalidData { field, reason } => {
                write!(f, "invalid {}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for AlipayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Key(err) => Some(err),
            _ => None,
        }
    }
}

impl From<KeyError> for AlipayError {
    fn from(err: KeyError) -> Self {
        Self::Key(err)
    }
}

impl From<serde_json::Error> for AlipayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
