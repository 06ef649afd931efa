//! Error types for Sphere API operations.
//!
//! Covers credential resolution, client construction, transport failures,
//! and non-success responses from the server. There is no retry layer; every
//! failure surfaces to the caller immediately.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Sphere operations.
pub type Result<T> = std::result::Result<T, SphereError>;

/// Errors that can occur while talking to the Sphere API.
#[derive(Debug, Error)]
pub enum SphereError {
    /// No API key could be found anywhere.
    #[error("no API credentials found (searched {searched})")]
    CredentialsNotFound {
        /// Human-readable list of the locations that were checked.
        searched: String,
    },

    /// A credential file exists but could not be read.
    #[error("credential file {path} is unreadable: {source}")]
    CredentialsUnreadable {
        /// Path to the offending file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A credential file exists but does not contain usable credentials.
    #[error("invalid credential file {path}: {reason}")]
    InvalidCredentials {
        /// Path to the offending file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// The configured server URL is not an HTTP(S) URL.
    #[error("invalid server URL '{url}': must start with http:// or https://")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
    },

    /// A local data file passed for upload does not exist.
    #[error("data file not found: {path}")]
    DataFileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The request could not be sent or the response body not read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status} for {operation}: {message}")]
    Api {
        /// The client operation that was being performed.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("could not decode {operation} response: {reason}")]
    Decode {
        /// The client operation that was being performed.
        operation: &'static str,
        /// Decoding failure detail.
        reason: String,
    },

    /// Filesystem error outside of credential reading.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
