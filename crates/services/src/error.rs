//! Shared error types for the services crate.

use thiserror::Error;

use storage::sqlite::SqliteInitError;

/// Errors from the remote question API or any other `QuestionSource`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("question api request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("question api rejected the request: {0}")]
    Rejected(String),
    #[error("question not found")]
    NotFound,
    #[error("unknown collection: {0}")]
    UnknownCollection(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("invalid api url: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl From<url::ParseError> for SourceError {
    fn from(err: url::ParseError) -> Self {
        SourceError::InvalidUrl(err.to_string())
    }
}

/// Errors emitted by `AuthService` and authenticators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("Username and password are required")]
    MissingCredentials,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("login could not be remembered")]
    NotPersisted,
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Source(#[from] SourceError),
}
