//! Application error type shared by the pipeline and the HTTP layer.
//!
//! Every failure is tagged as one of three kinds so callers can branch
//! without string-matching messages:
//!
//! - [`Error::Validation`] — bad client input → HTTP 400, message exposed.
//! - [`Error::Provider`] — an external embedding or generation call failed
//!   → HTTP 500, message names the provider origin.
//! - [`Error::Unexpected`] — anything else → HTTP 500 with a fixed body;
//!   details are logged, never sent to the client verbatim.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub type Result<T> = std::result::Result<T, Error>;

/// Which external collaborator a [`Error::Provider`] failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOrigin {
    Embedding,
    Generation,
}

impl std::fmt::Display for ProviderOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderOrigin::Embedding => write!(f, "embedding"),
            ProviderOrigin::Generation => write!(f, "generation"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid client input (empty question, empty document content).
    #[error("{0}")]
    Validation(String),

    /// An embedding or generation provider call failed after retries.
    #[error("{origin} provider error: {message}")]
    Provider {
        origin: ProviderOrigin,
        message: String,
    },

    /// Anything that is neither a validation nor a provider failure.
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn embedding(message: impl Into<String>) -> Self {
        Error::Provider {
            origin: ProviderOrigin::Embedding,
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Error::Provider {
            origin: ProviderOrigin::Generation,
            message: message.into(),
        }
    }
}

/// JSON error body. The `detail` field matches the wire contract existing
/// clients parse.
#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Error::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Error::Provider { .. } => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            Error::Unexpected(inner) => {
                tracing::error!(error = %inner, "unexpected error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}
