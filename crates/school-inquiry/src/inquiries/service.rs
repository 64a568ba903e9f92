use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    AdmissionInquiry, AdmissionRequest, ContactMessage, ContactRequest, SubmissionError,
};
use super::repository::InquiryRepository;
use crate::notify::{templates, Notifier, OutboundEmail};
use crate::store::{offload, Document, StoreError};

/// Service composing the repository and the notifier.
pub struct InquiryService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R, N> InquiryService<R, N>
where
    R: InquiryRepository + 'static,
    N: Notifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Validate, persist, then notify. The returned document is the stored record.
    pub async fn submit_contact(
        &self,
        request: ContactRequest,
    ) -> Result<Document<ContactMessage>, InquiryServiceError> {
        let submission = request.into_submission()?;
        let message = ContactMessage::received(submission, Utc::now());
        let repository = self.repository.clone();
        let stored = offload(move || repository.insert_contact(message)).await?;
        info!(
            id = %stored.id,
            inquiry_type = stored.record.inquiry_type.as_str(),
            "contact inquiry stored"
        );

        self.notify("contact", templates::contact_email(&stored.record))
            .await;
        Ok(stored)
    }

    pub async fn submit_admission(
        &self,
        request: AdmissionRequest,
    ) -> Result<Document<AdmissionInquiry>, InquiryServiceError> {
        let submission = request.into_submission()?;
        let inquiry = AdmissionInquiry::received(submission, Utc::now());
        let repository = self.repository.clone();
        let stored = offload(move || repository.insert_admission(inquiry)).await?;
        info!(
            id = %stored.id,
            class = stored.record.grade.as_str(),
            "admission inquiry stored"
        );

        self.notify("admission", templates::admission_email(&stored.record))
            .await;
        Ok(stored)
    }

    async fn notify(&self, kind: &'static str, email: OutboundEmail) {
        match self.notifier.send(email).await {
            Ok(delivery) => {
                info!(kind, message_id = %delivery.message_id, "inquiry notification sent");
            }
            Err(err) => {
                warn!(kind, error = %err, "inquiry notification failed; submission kept");
            }
        }
    }
}

/// Error raised by the inquiry service.
#[derive(Debug, thiserror::Error)]
pub enum InquiryServiceError {
    #[error(transparent)]
    Invalid(#[from] SubmissionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
