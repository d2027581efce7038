//! Error types for the marketplace client.

use thiserror::Error;

use crate::request::{RequestId, ResponseId};

/// Result type alias using the encargo error type.
pub type Result<T> = std::result::Result<T, EncargoError>;

/// Main error type for the marketplace client.
#[derive(Error, Debug)]
pub enum EncargoError {
    /// The backend rejected an accept-response call
    #[error("Accepting response {response_id} for request {request_id} failed with status {status}: {body}")]
    AcceptResponseFailed {
        request_id: RequestId,
        response_id: ResponseId,
        status: u16,
        body: String,
    },

    /// The backend rejected a product publish
    #[error("Product publish rejected with status {status}: {detail}")]
    PublishRejected { status: u16, detail: String },

    /// Any other non-success response from the backend
    #[error("Unexpected response status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// HTTP client error
    #[error("HTTP request failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General error from anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
