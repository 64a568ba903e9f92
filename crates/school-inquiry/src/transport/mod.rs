//! Delivery of validated form payloads, either to the inquiry API or to a
//! third-party email relay.

mod backend;
mod relay;

use async_trait::async_trait;
use serde::Serialize;

pub use backend::BackendTransport;
pub use relay::RelayTransport;

use crate::config::{ClientConfig, TransportKind};
use crate::inquiries::{AdmissionSubmission, ContactSubmission};

/// A normalized payload from one of the inquiry forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Submission {
    Contact(ContactSubmission),
    Admission(AdmissionSubmission),
}

impl Submission {
    /// API path accepting this payload.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Submission::Contact(_) => "/api/contact",
            Submission::Admission(_) => "/api/admissions",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Submission::Contact(_) => "contact",
            Submission::Admission(_) => "admission",
        }
    }
}

/// Acknowledgement from whichever side accepted the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("submission rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("relay transport is missing {0}")]
    NotConfigured(&'static str),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Network(err.to_string())
    }
}

#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn submit(&self, submission: &Submission) -> Result<Receipt, TransportError>;
}

/// Transport selected by `APP_SUBMIT_TRANSPORT`.
pub fn build_transport(
    config: &ClientConfig,
) -> Result<Box<dyn SubmissionTransport>, TransportError> {
    match config.transport {
        TransportKind::Backend => Ok(Box::new(BackendTransport::new(&config.api_url))),
        TransportKind::Relay => Ok(Box::new(RelayTransport::from_config(&config.relay)?)),
    }
}
