//! Errors surfaced by the async client.

use dti_core::{ApiError, Lookup};

/// The HTTP round-trip itself failed.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Network, DNS, TLS, timeout or body read failure.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// DTI answered with a non-2xx status code.
    #[error("DTI returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid proxy {url:?}: {source}")]
    InvalidProxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response arrived but could not be turned into what was asked for.
    #[error(transparent)]
    Api(ApiError),

    #[error("unknown species: {0}")]
    InvalidSpecies(Lookup),

    #[error("unknown color: {0}")]
    InvalidColor(Lookup),

    #[error("{species} cannot be painted {color}")]
    InvalidColorSpeciesPair { species: String, color: String },
}

impl From<ApiError> for Error {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::HttpStatus { status, body } => Error::Transport(TransportError::Status { status, body }),
            other => Error::Api(other),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Transport(TransportError::Request(error))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
