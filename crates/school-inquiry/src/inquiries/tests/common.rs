use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::inquiries::{AdmissionInquiry, ContactMessage, InquiryRepository, InquiryService};
use crate::notify::{Delivery, NotificationError, Notifier, OutboundEmail};
use crate::store::{Document, MemoryStore, StoreError};

pub(super) fn contact_payload() -> Value {
    json!({
        "name": "Asha Verma",
        "email": "asha@example.com",
        "phone": "9876543210",
        "message": "Is the bus route covering Sector 12?",
        "inquiryType": "general"
    })
}

pub(super) fn admission_payload() -> Value {
    json!({
        "studentName": "Ravi Kumar",
        "parentName": "Meena Kumar",
        "email": "meena@example.com",
        "phone": "9123456780",
        "class": "UKG"
    })
}

pub(super) fn build_service() -> (
    InquiryService<MemoryStore, RecordingNotifier>,
    Arc<MemoryStore>,
    Arc<RecordingNotifier>,
) {
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = InquiryService::new(store.clone(), notifier.clone());
    (service, store, notifier)
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingNotifier {
    pub(super) fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, email: OutboundEmail) -> Result<Delivery, NotificationError> {
        let mut sent = self.sent.lock().expect("notifier mutex poisoned");
        sent.push(email);
        Ok(Delivery {
            message_id: format!("<recorded-{}@test>", sent.len()),
        })
    }
}

pub(super) struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _email: OutboundEmail) -> Result<Delivery, NotificationError> {
        Err(NotificationError::Transport("connection refused".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl InquiryRepository for UnavailableRepository {
    fn insert_contact(
        &self,
        _message: ContactMessage,
    ) -> Result<Document<ContactMessage>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn insert_admission(
        &self,
        _inquiry: AdmissionInquiry,
    ) -> Result<Document<AdmissionInquiry>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
