use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::debug;

use super::{Receipt, Submission, SubmissionTransport, TransportError};

const FALLBACK_ERROR: &str = "Something went wrong. Please try again.";

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: String,
}

/// Posts submissions as JSON to the inquiry API.
#[derive(Debug, Clone)]
pub struct BackendTransport {
    http: reqwest::Client,
    base_url: String,
}

impl BackendTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SubmissionTransport for BackendTransport {
    async fn submit(&self, submission: &Submission) -> Result<Receipt, TransportError> {
        let url = format!("{}{}", self.base_url, submission.endpoint());
        debug!(%url, kind = submission.kind(), "posting submission");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let message = serde_json::from_str::<ApiMessage>(&body)
            .map(|parsed| parsed.message)
            .unwrap_or_default();

        if status.is_success() {
            return Ok(Receipt { message });
        }
        Err(TransportError::Rejected {
            status: status.as_u16(),
            message: if message.is_empty() {
                FALLBACK_ERROR.to_string()
            } else {
                message
            },
        })
    }
}
