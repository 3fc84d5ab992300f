//! Backend API error types

use thiserror::Error;

use super::types::Endpoint;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error on {endpoint} (status {status_code}): {message}")]
    Status {
        endpoint: Endpoint,
        status_code: u16,
        message: String,
    },

    #[error("Failed to parse response from {endpoint}: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Response from {endpoint} is not a non-empty array")]
    EmptyResponse { endpoint: Endpoint },

    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn decode(endpoint: Endpoint, source: serde_json::Error) -> Self {
        ApiError::Decode { endpoint, source }
    }
}
