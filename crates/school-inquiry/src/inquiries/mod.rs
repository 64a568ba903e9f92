//! Contact and admission inquiry intake.
//!
//! Requests are checked for required fields, persisted, and then handed to the
//! notifier. Persistence alone decides the outcome of a submission; a failed
//! notification is logged and otherwise ignored.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AdmissionInquiry, AdmissionRequest, AdmissionSubmission, ContactMessage, ContactRequest,
    ContactSubmission, Grade, InquiryType, SubmissionError,
};
pub use repository::InquiryRepository;
pub use router::inquiry_router;
pub use service::{InquiryService, InquiryServiceError};
