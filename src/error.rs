//! Error types, one enum per layer.

use thiserror::Error;

use crate::task::{Bucket, TaskId};

/// Failures talking to the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the bearer token (missing, expired or invalid).
    #[error("not authorized, log in again")]
    Unauthorized,

    /// Any other non-success response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid base URL: {0}")]
    BaseUrl(String),
}

/// Failures of the on-disk key/value file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid key/value file: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("value under '{key}' is malformed: {source}")]
    Value {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures of a backing store, whichever kind it is.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("must re-authenticate")]
    Unauthorized,

    #[error(transparent)]
    Api(ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => StoreError::Unauthorized,
            other => StoreError::Api(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum BoardError {
    /// The store refused the session; the caller should send the user to log in.
    #[error("session expired or missing, log in again")]
    ReauthRequired,

    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("no task at position {index} in {}", .bucket.label())]
    NoSuchPosition { bucket: Bucket, index: usize },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for BoardError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unauthorized => BoardError::ReauthRequired,
            other => BoardError::Store(other),
        }
    }
}

/// Input rejected before anything is sent anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    NoSuchDate { year: i32, month: u32, day: u32 },

    #[error("unknown month '{0}'")]
    UnknownMonth(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no refresh token stored, log in first")]
    NotLoggedIn,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Figment(Box::new(err))
    }
}
