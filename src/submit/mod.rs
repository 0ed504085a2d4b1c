//! Form submission to the remote endpoint

mod client;
mod payload;
mod traits;

pub use client::HttpSubmitter;
pub use payload::Payload;
pub use traits::{SubmissionError, Submitter};

#[cfg(test)]
pub use traits::MockSubmitter;
