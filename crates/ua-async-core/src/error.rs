// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for OPC UA request dispatch.
//!
//! # Error Categories
//!
//! ```text
//! UaError
//! ├── BadStatus      - Bad status code reported for an operation
//! ├── Disconnected   - BadDisconnect, raised separately to catch client disconnects
//! ├── User           - Error returned by a transform or completion handler
//! ├── Panicked       - Panic caught at the callback boundary
//! └── Configuration  - Invalid settings
//! ```
//!
//! # Examples
//!
//! ```
//! use ua_async_core::{StatusCode, UaError};
//!
//! let error = UaError::from_status(StatusCode::BAD_TIMEOUT);
//! assert_eq!(error.status_code(), StatusCode::BAD_TIMEOUT);
//! assert!(error.is_retryable());
//!
//! let error = UaError::from_status(StatusCode::BAD_DISCONNECT);
//! assert!(error.is_disconnect());
//! ```

use std::any::Any;
use std::time::Duration;

use thiserror::Error;
use tracing::Level;

use crate::status::StatusCode;

/// Boxed error type accepted from user code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for dispatch operations.
pub type UaResult<T> = Result<T, UaError>;

// =============================================================================
// UaError - Main Error Type
// =============================================================================

/// The main error type.
#[derive(Debug, Error)]
pub enum UaError {
    /// An operation reported a bad status code.
    #[error("{0}")]
    BadStatus(StatusCode),

    /// The server has disconnected from the client (`BadDisconnect`).
    #[error("{}", StatusCode::BAD_DISCONNECT)]
    Disconnected,

    /// An error returned by user code (a transform or a completion handler).
    #[error("{0}")]
    User(#[source] BoxError),

    /// A panic caught while running user code inside a callback.
    #[error("panic in user code: {0}")]
    Panicked(String),

    /// Configuration errors.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
}

impl UaError {
    // =========================================================================
    // Factory Methods
    // =========================================================================

    /// Creates the failure for a bad status code.
    ///
    /// `BadDisconnect` maps to [`UaError::Disconnected`].
    pub fn from_status(code: StatusCode) -> Self {
        if code == StatusCode::BAD_DISCONNECT {
            Self::Disconnected
        } else {
            Self::BadStatus(code)
        }
    }

    /// Wraps an error raised by user code.
    pub fn user(error: impl Into<BoxError>) -> Self {
        Self::User(error.into())
    }

    /// Converts a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "<non-string panic payload>".to_string()
        };
        Self::Panicked(message)
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// Returns the status code describing this error.
    ///
    /// Errors that do not carry a code map to `BadInternalError`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadStatus(code) => *code,
            Self::Disconnected => StatusCode::BAD_DISCONNECT,
            Self::Configuration(_) => StatusCode::BAD_CONFIGURATION_ERROR,
            Self::User(_) | Self::Panicked(_) => StatusCode::BAD_INTERNAL_ERROR,
        }
    }

    /// Returns `true` if this is the disconnect failure.
    #[inline]
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::Disconnected)
    }

    /// Returns the user error if it is of type `E`.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::User(error) => error.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Returns `true` if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::BadStatus(code) => matches!(
                *code,
                StatusCode::BAD_TIMEOUT
                    | StatusCode::BAD_COMMUNICATION_ERROR
                    | StatusCode::BAD_SERVER_NOT_CONNECTED
                    | StatusCode::BAD_TOO_MANY_OPERATIONS
                    | StatusCode::BAD_CONNECTION_CLOSED
            ),
            Self::Disconnected => true,
            Self::User(_) | Self::Panicked(_) | Self::Configuration(_) => false,
        }
    }

    /// Returns the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::BadStatus(_) => "status",
            Self::Disconnected => "connection",
            Self::User(_) => "user",
            Self::Panicked(_) => "panic",
            Self::Configuration(_) => "configuration",
        }
    }

    /// Returns the tracing level appropriate for this error.
    pub fn tracing_level(&self) -> Level {
        match self {
            Self::Panicked(_) | Self::Configuration(_) => Level::ERROR,
            _ if self.is_retryable() => Level::WARN,
            _ => Level::ERROR,
        }
    }

    /// Logs this error with context.
    pub fn log(&self, context: &str) {
        let code = self.status_code();
        if self.tracing_level() == Level::WARN {
            tracing::warn!(
                context = context,
                category = self.category(),
                status = %code,
                "{}",
                self
            );
        } else {
            tracing::error!(
                context = context,
                category = self.category(),
                status = %code,
                "{}",
                self
            );
        }
    }
}

impl From<StatusCode> for UaError {
    fn from(code: StatusCode) -> Self {
        Self::from_status(code)
    }
}

// =============================================================================
// ConfigurationError
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Invalid endpoint URL.
    #[error("Invalid endpoint URL: {url} ({reason})")]
    InvalidEndpoint {
        /// The invalid URL.
        url: String,
        /// Reason.
        reason: String,
    },

    /// Invalid timeout value.
    #[error("Invalid timeout: {duration:?} ({reason})")]
    InvalidTimeout {
        /// The invalid duration.
        duration: Duration,
        /// Reason.
        reason: String,
    },

    /// Missing required field.
    #[error("Missing required configuration: {field}")]
    MissingField {
        /// The missing field.
        field: String,
    },

    /// The configuration source could not be read or parsed.
    #[error("Failed to load configuration from {source_name}: {message}")]
    Load {
        /// File path or other source description.
        source_name: String,
        /// Error message.
        message: String,
    },
}

impl ConfigurationError {
    /// Creates an invalid endpoint error.
    pub fn invalid_endpoint(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid timeout error.
    pub fn invalid_timeout(duration: Duration, reason: impl Into<String>) -> Self {
        Self::InvalidTimeout {
            duration,
            reason: reason.into(),
        }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }

    /// Creates a load error.
    pub fn load(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
