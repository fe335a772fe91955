//! Client error types.

use std::path::PathBuf;

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// No bearer token was configured and no override was given.
    #[error("API token not set")]
    MissingToken,

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An API path contains a `.` or `..` segment, usually from an ID.
    #[error("Invalid path segment in \"{0}\"")]
    InvalidPath(String),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP request failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a status outside the accepted set.
    #[error("API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A payload was required but the response body was empty.
    #[error("Empty response body")]
    EmptyBody,

    /// A local file could not be used for upload.
    #[error("File error ({}): {reason}", path.display())]
    File {
        /// Offending path.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// Local IO failed while writing a download.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invite type name is not one the API knows.
    #[error("Unknown invite type: \"{0}\"")]
    InvalidInviteType(String),
}

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Status { status: 404, .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::MissingToken) || matches!(self, Error::Status { status: 401, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Status { status, .. } if *status >= 500)
    }

    /// True when the call was rejected before any network request was made.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Error::MissingToken
                | Error::Config(_)
                | Error::InvalidUrl(_)
                | Error::InvalidPath(_)
                | Error::File { .. }
                | Error::InvalidInviteType(_)
        )
    }

    pub(crate) fn file(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::File {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
