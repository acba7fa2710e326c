//! Error types for the contract runner.
//!
//! Assertion mismatches are not errors: they are recorded as failed
//! [`AssertionResult`](crate::testing::assertion::AssertionResult)s. The
//! variants here cover the infrastructure side of a run.

use thiserror::Error;

/// Result type alias for contract runner operations.
pub type Result<T> = std::result::Result<T, ContractError>;

#[derive(Debug, Error)]
pub enum ContractError {
    /// Network, DNS, timeout or body-read failure.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The body could not be parsed as JSON although a field check needed it.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The case itself cannot be turned into a valid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Builder errors (bad header, bad URL) belong to the case; the rest to the wire.
impl From<reqwest::Error> for ContractError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ContractError::InvalidRequest(err.to_string())
        } else {
            ContractError::Transport(err.to_string())
        }
    }
}
