//! Error types for netscribe.
//!
//! Command-level failures (timeouts, dropped sessions mid-command) are not
//! errors here: they are captured inside a [`Response`](crate::Response).
//! Everything in this module aborts the calling operation.

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::transport::TransportKind;

/// Main error type for netscribe operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Session lifecycle errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Template lookup and expansion errors
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Extraction pipeline errors
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Field normalization errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Transport layer errors (connection, authentication, I/O).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {message}")]
    ConnectionFailed {
        host: String,
        port: u16,
        message: String,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// The connector cannot serve this transport kind
    #[error("Transport kind '{0}' is not supported by this connector")]
    Unsupported(TransportKind),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TransportError {
    /// Whether the failure may clear up on a retry.
    ///
    /// Authentication and unsupported-transport failures are final for the
    /// current call; everything else is treated as a flaky channel.
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            TransportError::AuthenticationFailed { .. }
                | TransportError::Unsupported(_)
                | TransportError::Key(_)
        )
    }

    /// Short classification label recorded in failed responses.
    pub fn kind(&self) -> FailureKind {
        match self {
            TransportError::Timeout(_) => FailureKind::Timeout,
            TransportError::Disconnected | TransportError::ConnectionFailed { .. } => {
                FailureKind::Disconnected
            }
            TransportError::AuthenticationFailed { .. } | TransportError::Key(_) => {
                FailureKind::Authentication
            }
            TransportError::Ssh(_) | TransportError::Io(_) | TransportError::Unsupported(_) => {
                FailureKind::Transport
            }
        }
    }
}

/// Classification of a command-level failure stored in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum FailureKind {
    Timeout,
    Disconnected,
    Authentication,
    Transport,
    /// The device answered, but the output matched a vendor failure pattern.
    DeviceRejected,
}

/// Session lifecycle errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// No usable connection could be established or revalidated
    #[error("Unable to connect a session to {host} to send command")]
    Unavailable { host: String },

    /// Retry budget below one
    #[error("`max_tries` must be 1 or greater, got {0}")]
    InvalidMaxTries(u32),

    /// Invalid configuration in the session builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Vendor not present in the registry
    #[error("Unknown vendor '{name}'")]
    UnknownVendor { name: String },
}

/// Template resolution errors.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Name is neither a path, a built-in, nor inline source
    #[error(
        "template '{name}' for vendor '{vendor}' must be a file path, a built-in template, or template source"
    )]
    NotFound { vendor: String, name: String },

    /// A `#NAME#` placeholder had no fragment in the registry
    #[error("template '{template}' references unknown pattern fragment `#{fragment}#`")]
    UnresolvedMacro { template: String, fragment: String },

    /// The pattern matcher rejected the template or the input
    #[error("template '{template}' failed: {message}")]
    Compile { template: String, message: String },

    /// Reading a template from disk failed
    #[error("failed to read template '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Extraction pipeline errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// Nothing to parse
    #[error("extraction requires at least one non-empty input")]
    EmptyInput,

    /// Flatten key missing from a row
    #[error("flatten key '{key}' is not present in every row")]
    MissingKey { key: String },
}

/// Field normalization errors. Any of these aborts the whole batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("unrecognized speed '{0}'")]
    Speed(String),

    #[error("invalid MAC address '{0}'")]
    Mac(String),

    #[error("field '{field}' is not a number: '{value}'")]
    Number { field: String, value: String },

    #[error("field '{field}' is not a valid IP address: '{value}'")]
    Ip { field: String, value: String },

    #[error("field '{field}' is not a yes/no flag: '{value}'")]
    Flag { field: String, value: String },

    #[error("unrecognized optical alert '{0}'")]
    Alert(String),

    #[error("unrecognized TDR status '{0}'")]
    TdrStatus(String),

    #[error("required field '{0}' is missing")]
    MissingField(String),

    #[error("optical thresholds for '{0}' are out of order")]
    Thresholds(String),
}

/// Result type alias using netscribe's Error.
pub type Result<T> = std::result::Result<T, Error>;
