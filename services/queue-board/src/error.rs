//! Error types for queue snapshot operations.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Result alias used throughout the crate.
pub type BoardResult<T> = Result<T, BoardError>;

/// Errors raised while reading queue state.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Redis command failed (connection, timeout, protocol).
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A job hash field holds text that is not valid JSON.
    #[error("Invalid JSON in job field `{field}`: {source}")]
    Decode {
        /// Hash field that failed to decode.
        field: &'static str,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// A job hash field holds text that is not an integer.
    #[error("Invalid integer in job field `{field}`: {value:?}")]
    InvalidInteger {
        /// Hash field that failed to parse.
        field: &'static str,
        /// Raw field value.
        value: String,
    },

    /// A listed job was removed before its hash could be read.
    #[error("Job `{id}` of queue `{queue}` disappeared while being read")]
    MissingJob {
        /// Queue the job was listed in.
        queue: String,
        /// Job identifier.
        id: String,
    },

    /// Two queues were registered under the same name.
    #[error("Queue already registered: {0}")]
    DuplicateQueue(String),
}

impl IntoResponse for BoardError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Queue snapshot failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
