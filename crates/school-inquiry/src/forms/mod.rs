//! Client-side form state for the contact and admission pages.
//!
//! Forms hold raw input, report which fields are valid, and produce the
//! normalized payload handed to a [`SubmissionTransport`](crate::transport::SubmissionTransport).

mod model;
mod session;
pub mod validator;

pub use model::{AdmissionForm, ContactForm, Field, FormReport, InquiryForm};
pub use session::{FormSession, SubmissionStatus, SubmitBlocked, INVALID_FORM_MESSAGE};
