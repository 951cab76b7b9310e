use reqwest::StatusCode;
use thiserror::Error;

/// Failures at the auth backend boundary.
///
/// The GraphQL consumer only ever sees the flat message, but status,
/// decode and transport failures stay distinct for logging and tests.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with a non-200 status.
    #[error("Failed to {operation}: {status}")]
    Status {
        operation: &'static str,
        status: StatusCode,
    },

    /// The backend answered 200 with a body that does not match the
    /// expected schema.
    #[error("Failed to decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The request never completed.
    #[error("auth backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid backend URL: {0}")]
    Config(String),
}
