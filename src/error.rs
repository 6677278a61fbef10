//! Error types for AtlasDict
//!
//! Provides a unified error type for all client operations.
//!
//! "Nothing found" replies (no match, no definitions, empty database or
//! strategy lists) are not errors; they come back as empty collections.

use std::fmt;

use thiserror::Error;

/// Result type alias using DictError
pub type Result<T> = std::result::Result<T, DictError>;

/// Unified error type for AtlasDict operations
#[derive(Debug, Error)]
pub enum DictError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Connection failed ({reason}): {detail}")]
    Connection {
        reason: ConnectFailure,
        detail: String,
    },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolViolation),

    #[error("Server rejected request: {code} {message}")]
    Rejected { code: u16, message: String },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Usage Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Session is closed")]
    SessionClosed,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DictError {
    /// Whether the session that produced this error should be abandoned.
    ///
    /// Transport failures and grammar violations leave the reply stream at an
    /// unknown position; a server rejection does not.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DictError::Io(_) | DictError::Protocol(_))
    }

    /// True for the `550 invalid database` rejection
    pub fn is_invalid_database(&self) -> bool {
        matches!(self, DictError::Rejected { code: 550, .. })
    }

    pub(crate) fn connection(reason: ConnectFailure, detail: impl Into<String>) -> Self {
        DictError::Connection {
            reason,
            detail: detail.into(),
        }
    }
}

/// Why a connection could not be established
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectFailure {
    /// Connect attempt ran out of time
    Timeout,

    /// Host name did not resolve to any address
    UnresolvedHost,

    /// Peer actively refused the connection
    Refused,

    /// Any other transport-establishment failure
    Other,
}

impl fmt::Display for ConnectFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectFailure::Timeout => "timeout",
            ConnectFailure::UnresolvedHost => "unresolved host",
            ConnectFailure::Refused => "refused",
            ConnectFailure::Other => "other",
        };
        f.write_str(name)
    }
}

impl From<std::io::ErrorKind> for ConnectFailure {
    fn from(kind: std::io::ErrorKind) -> Self {
        use std::io::ErrorKind;

        match kind {
            ErrorKind::ConnectionRefused => ConnectFailure::Refused,
            ErrorKind::TimedOut | ErrorKind::WouldBlock => ConnectFailure::Timeout,
            _ => ConnectFailure::Other,
        }
    }
}

/// Received data that does not fit the reply grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    #[error("unexpected greeting: {}", describe(.raw))]
    UnexpectedGreeting { raw: Option<String> },

    #[error("unexpected status: {}", describe(.raw))]
    UnexpectedStatus { raw: Option<String> },

    #[error("unexpected ending message: {}", describe(.raw))]
    UnexpectedEnding { raw: Option<String> },

    #[error("connection closed in the middle of a reply body")]
    PrematureEof,

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("line exceeds {limit} bytes")]
    LineTooLong { limit: usize },
}

fn describe(raw: &Option<String>) -> String {
    match raw {
        Some(line) => format!("{:?}", line),
        None => "<end of stream>".to_string(),
    }
}
