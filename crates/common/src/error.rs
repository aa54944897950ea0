use std::path::PathBuf;

use thiserror::Error;

/// Boxed error raised by an HTTP transport. Kept as-is so callers can downcast it (e.g. to
/// check for a timeout).
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while preparing, uploading or resolving pinned content.
#[derive(Error, Debug)]
pub enum PinError {
    /// The backend has no default configuration and none was supplied.
    #[error("missing configuration: {0}")]
    MissingConfiguration(&'static str),

    /// A request was built against an empty endpoint.
    #[error("endpoint cannot be empty")]
    EmptyEndpoint,

    /// The credential key was found in neither the `.env` file nor the process environment.
    #[error("authentication key '{0}' not found in .env or environment")]
    AuthKeyNotFound(String),

    /// Credentials were attached to a backend that is configured as authless.
    #[error("backend '{0}' is authless and does not accept credentials")]
    AuthlessBackend(String),

    /// No local IPFS daemon process is running.
    #[error("IPFS daemon is not running")]
    DaemonNotRunning,

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The request never produced a response (connection failure, timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// The response body did not match the backend's schema.
    #[error("unexpected {backend} response: {reason}")]
    Schema {
        /// Name of the backend whose schema was violated
        backend: &'static str,
        /// What was wrong with the body
        reason: String,
    },

    /// The content file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Path of the content file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// `open` was called on content that is already open.
    #[error("content {} is already opened", .0.display())]
    AlreadyOpen(PathBuf),

    /// `close` was called on content that was never opened.
    #[error("content {} is not yet opened", .0.display())]
    NotOpen(PathBuf),

    /// A request payload was requested before the content bytes were loaded.
    #[error("content bytes of {} have not been read", .0.display())]
    NotLoaded(PathBuf),

    /// A request payload was requested from an empty file.
    #[error("content {} is empty", .0.display())]
    EmptyContent(PathBuf),

    /// A URI or gateway URL was requested before the content was pinned.
    #[error("content {} is not pinned yet", .0.display())]
    NotPinned(PathBuf),

    /// The gateway name is not in the registry.
    #[error("unknown gateway '{name}'{}", .suggestion.as_ref().map(|s| format!(", did you mean '{s}'?")).unwrap_or_default())]
    UnknownGateway {
        /// The requested name
        name: String,
        /// The closest registered name, if any is close enough
        suggestion: Option<String>,
    },

    /// Subdomain-style addressing was requested from a gateway that does not support it.
    #[error("gateway '{0}' doesn't support subdomain addressing")]
    UnsupportedSubdomain(String),

    /// The gateway style is neither `path` nor `subdomain`.
    #[error("invalid gateway style '{0}', expected one of: path, subdomain")]
    InvalidGatewayStyle(String),
}

impl PinError {
    /// Wraps any transport failure, preserving it as the error source.
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<TransportError>,
    {
        Self::Transport(err.into())
    }

    /// Builds a [`PinError::Schema`] for the given backend.
    pub fn schema(backend: &'static str, reason: impl ToString) -> Self {
        Self::Schema { backend, reason: reason.to_string() }
    }
}

/// Result alias used across the pinning crates.
pub type Result<T, E = PinError> = std::result::Result<T, E>;
