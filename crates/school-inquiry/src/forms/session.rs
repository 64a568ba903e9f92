use tracing::{debug, warn};

use super::model::{Field, FormReport, InquiryForm};
use crate::transport::{Receipt, Submission, SubmissionTransport, TransportError};

pub const INVALID_FORM_MESSAGE: &str = "Please fill all fields correctly.";

/// Outcome shown next to the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitBlocked {
    #[error("a submission is already in flight")]
    InFlight,
    #[error("Please fill all fields correctly.")]
    Invalid,
}

/// A form plus its submission state. At most one submission is in flight.
#[derive(Debug, Default)]
pub struct FormSession<F> {
    form: F,
    status: SubmissionStatus,
    in_flight: bool,
}

impl<F: InquiryForm> FormSession<F> {
    pub fn new(form: F) -> Self {
        Self {
            form,
            status: SubmissionStatus::Idle,
            in_flight: false,
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    pub fn set_field(&mut self, field: Field, value: &str) {
        self.form.set_field(field, value);
    }

    pub fn report(&self) -> FormReport {
        self.form.report()
    }

    pub fn can_submit(&self) -> bool {
        !self.in_flight && self.form.report().submittable
    }

    /// Start a submission, clearing any previous status.
    pub fn begin(&mut self) -> Result<Submission, SubmitBlocked> {
        if self.in_flight {
            return Err(SubmitBlocked::InFlight);
        }
        self.status = SubmissionStatus::Idle;
        match self.form.submission() {
            Some(submission) => {
                self.in_flight = true;
                Ok(submission)
            }
            None => {
                self.status = SubmissionStatus::Error(INVALID_FORM_MESSAGE.to_string());
                Err(SubmitBlocked::Invalid)
            }
        }
    }

    /// Record the transport outcome. Success clears the form.
    pub fn finish(&mut self, outcome: Result<Receipt, TransportError>) -> &SubmissionStatus {
        self.in_flight = false;
        self.status = match outcome {
            Ok(receipt) => {
                debug!(message = %receipt.message, "submission accepted");
                self.form.clear();
                SubmissionStatus::Success(self.form.success_message().to_string())
            }
            Err(err) => {
                warn!(error = %err, "submission failed");
                let message = match err {
                    TransportError::Rejected { message, .. } if !message.is_empty() => message,
                    _ => self.form.failure_message().to_string(),
                };
                SubmissionStatus::Error(message)
            }
        };
        &self.status
    }

    pub async fn submit<T>(&mut self, transport: &T) -> &SubmissionStatus
    where
        T: SubmissionTransport + ?Sized,
    {
        let submission = match self.begin() {
            Ok(submission) => submission,
            Err(_) => return &self.status,
        };
        let outcome = transport.submit(&submission).await;
        self.finish(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::forms::{AdmissionForm, ContactForm};

    #[derive(Default)]
    struct RecordingTransport {
        submissions: Mutex<Vec<Submission>>,
    }

    #[async_trait]
    impl SubmissionTransport for RecordingTransport {
        async fn submit(&self, submission: &Submission) -> Result<Receipt, TransportError> {
            self.submissions
                .lock()
                .expect("transport mutex poisoned")
                .push(submission.clone());
            Ok(Receipt {
                message: "stored".to_string(),
            })
        }
    }

    struct RejectingTransport(TransportError);

    #[async_trait]
    impl SubmissionTransport for RejectingTransport {
        async fn submit(&self, _submission: &Submission) -> Result<Receipt, TransportError> {
            Err(match &self.0 {
                TransportError::Rejected { status, message } => TransportError::Rejected {
                    status: *status,
                    message: message.clone(),
                },
                _ => TransportError::Network("connection refused".to_string()),
            })
        }
    }

    fn filled_contact() -> FormSession<ContactForm> {
        let mut session = FormSession::new(ContactForm::default());
        session.set_field(Field::Name, "Asha Verma");
        session.set_field(Field::Email, "asha@example.com");
        session.set_field(Field::Phone, "98765 43210");
        session.set_field(Field::Message, "When does term start?");
        session
    }

    #[tokio::test]
    async fn successful_submit_clears_form() {
        let transport = RecordingTransport::default();
        let mut session = filled_contact();

        let status = session.submit(&transport).await.clone();

        assert_eq!(
            status,
            SubmissionStatus::Success(
                "Thank you! Your message has been sent successfully.".to_string()
            )
        );
        assert_eq!(session.form(), &ContactForm::default());
        assert!(!session.is_submitting());
        assert_eq!(transport.submissions.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_transport() {
        let transport = RecordingTransport::default();
        let mut session = filled_contact();
        session.set_field(Field::Message, "Hi");

        let status = session.submit(&transport).await.clone();

        assert_eq!(
            status,
            SubmissionStatus::Error(INVALID_FORM_MESSAGE.to_string())
        );
        assert!(transport.submissions.lock().expect("lock").is_empty());
        assert_eq!(session.form().message, "Hi");
    }

    #[test]
    fn second_submit_is_blocked_while_in_flight() {
        let mut session = filled_contact();

        assert!(session.begin().is_ok());
        assert!(session.is_submitting());
        assert!(!session.can_submit());
        assert_eq!(session.begin(), Err(SubmitBlocked::InFlight));

        session.finish(Ok(Receipt {
            message: "stored".to_string(),
        }));
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn server_rejection_message_is_shown() {
        let transport = RejectingTransport(TransportError::Rejected {
            status: 400,
            message: "All fields are required".to_string(),
        });
        let mut session = filled_contact();

        let status = session.submit(&transport).await.clone();

        assert_eq!(
            status,
            SubmissionStatus::Error("All fields are required".to_string())
        );
        assert_eq!(session.form().name, "Asha Verma");
    }

    #[tokio::test]
    async fn network_failure_uses_generic_message() {
        let transport = RejectingTransport(TransportError::Network("down".to_string()));
        let mut session = FormSession::new(AdmissionForm::default());
        session.set_field(Field::StudentName, "Ravi");
        session.set_field(Field::ParentName, "Meena");
        session.set_field(Field::Email, "meena@example.com");
        session.set_field(Field::Phone, "9123456780");
        session.set_field(Field::Class, "V");

        let status = session.submit(&transport).await.clone();

        assert_eq!(
            status,
            SubmissionStatus::Error("Submission failed. Please try again later.".to_string())
        );
        assert!(!session.is_submitting());
    }
}
