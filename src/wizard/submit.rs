//! Transport seam between the wizard and the submission endpoint.

use std::future::Future;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::submission::QuoteSubmission;

/// Generic message shown when the endpoint gives no usable reason.
pub const GENERIC_SUBMIT_ERROR: &str = "Došlo je do greške prilikom slanja upita.";

/// Acknowledgment returned by the endpoint after a successful send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitAck {
    pub message: String,
}

/// Failure to deliver a submission; collected data stays in the wizard.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl SubmitError {
    /// Text suitable for a blocking alert.
    pub fn user_message(&self) -> &str {
        match self {
            SubmitError::Transport(_) => GENERIC_SUBMIT_ERROR,
            SubmitError::Rejected { message, .. } => message,
        }
    }
}

/// JSON body of the endpoint: `{success, message}` or `{error}`.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Sends a finalized submission to the quote endpoint.
pub trait QuoteSubmitter {
    fn submit(
        &self,
        submission: &QuoteSubmission,
    ) -> impl Future<Output = Result<SubmitAck, SubmitError>>;
}
