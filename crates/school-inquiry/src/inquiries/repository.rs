use super::domain::{AdmissionInquiry, ContactMessage};
use crate::store::{Document, StoreError};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait InquiryRepository: Send + Sync {
    fn insert_contact(
        &self,
        message: ContactMessage,
    ) -> Result<Document<ContactMessage>, StoreError>;
    fn insert_admission(
        &self,
        inquiry: AdmissionInquiry,
    ) -> Result<Document<AdmissionInquiry>, StoreError>;
}
