//! Error types for the RT client.
//!
//! This module defines `RtError`, the unified error type used throughout
//! the crate for consistent error handling and propagation.
//!
//! # Security
//!
//! Passwords and auth tokens must never appear in logs or error messages.
//! Use `sanitize_message()` when building messages from server responses.

use std::time::Duration;
use thiserror::Error;

use crate::models::{Operation, RecordType};

/// Unified error type for all RT client operations.
#[derive(Error, Debug)]
pub enum RtError {
    /// Configuration error - missing or invalid environment variables.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failed during transmission.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// HTTP response returned a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The response body, sanitized and truncated.
        body: String,
    },

    /// Request timed out.
    #[error("request timed out after {duration:?} ({operation})")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The operation that timed out.
        operation: String,
    },

    /// Authentication failed - bad credentials or expired session.
    #[error("authentication failed - check RT credentials")]
    Authentication,

    /// Requested record was not found.
    #[error("record not found: {id}")]
    NotFound {
        /// The ID of the record that was not found.
        id: String,
    },

    /// The REST 1.0 status line reported a failure.
    #[error("RT error {code}: {message}")]
    RtApi {
        /// Status code from the RT status line.
        code: u16,
        /// Reason text from the status line.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation is not available for this record type.
    #[error("{operation} is not supported for record type {record_type} due to RT API limitations")]
    Unsupported {
        /// The rejected operation.
        operation: Operation,
        /// The record type it was attempted on.
        record_type: RecordType,
    },

    /// Unknown record type name.
    #[error("invalid record type: {0}")]
    InvalidRecordType(String),

    /// Unknown ticket status name.
    #[error("invalid ticket status type {0}")]
    InvalidStatus(String),

    /// Reading an attachment from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection test failed.
    #[error("connection test failed: {message}")]
    ConnectionTest {
        /// Details about why the connection test failed.
        message: String,
    },
}

impl RtError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        RtError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        RtError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        RtError::Validation(message.into())
    }

    /// Creates a not found error for a record ID.
    pub fn not_found(id: impl Into<String>) -> Self {
        RtError::NotFound { id: id.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        RtError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Creates an unsupported operation error.
    pub fn unsupported(operation: Operation, record_type: RecordType) -> Self {
        RtError::Unsupported {
            operation,
            record_type,
        }
    }

    /// Creates an error from a failing REST 1.0 status line.
    pub fn rt_api(code: u16, message: impl Into<String>) -> Self {
        RtError::RtApi {
            code,
            message: message.into(),
        }
    }

    /// Creates a connection test error.
    pub fn connection_test(message: impl Into<String>) -> Self {
        RtError::ConnectionTest {
            message: message.into(),
        }
    }

    /// Returns true if the error was raised before any request was sent.
    #[must_use]
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            RtError::Config(_)
                | RtError::Validation(_)
                | RtError::Unsupported { .. }
                | RtError::InvalidRecordType(_)
                | RtError::InvalidStatus(_)
        )
    }

    /// Replaces every non-empty secret in `message` with `[REDACTED]`.
    #[must_use]
    pub fn sanitize_message(message: &str, secrets: &[&str]) -> String {
        secrets
            .iter()
            .filter(|s| !s.is_empty())
            .fold(message.to_string(), |acc, secret| {
                acc.replace(secret, "[REDACTED]")
            })
    }

    /// Creates a sanitized version of this error's display message.
    #[must_use]
    pub fn sanitized_display(&self, secrets: &[&str]) -> String {
        Self::sanitize_message(&self.to_string(), secrets)
    }
}
