//! Trait abstraction for the submission client to enable mocking in tests

use super::payload::Payload;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("No submission endpoint configured")]
    NoEndpoint,
    #[error("Server responded with HTTP {0}")]
    Status(u16),
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Could not attach file: {0}")]
    Attachment(#[from] std::io::Error),
}

/// Sends a completed form somewhere
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Submitter: Send + Sync {
    /// Deliver the payload; `Ok` only for a 2xx response
    async fn submit(&self, payload: Payload) -> Result<(), SubmissionError>;
}
