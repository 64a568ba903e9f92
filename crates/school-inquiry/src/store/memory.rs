use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{sort_key, Collection, Document, DocumentId, Ordering, StoreError};
use crate::catalog::{CatalogRepository, FeeSchedule, Notice};
use crate::inquiries::{AdmissionInquiry, ContactMessage, InquiryRepository};

#[derive(Debug, Clone)]
struct StoredDocument {
    id: DocumentId,
    sort_key: String,
    body: serde_json::Value,
}

/// Process-local document store used for `memory://` and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<Collection, Vec<StoredDocument>>>>,
}

impl MemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Collection, Vec<StoredDocument>>>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn insert<T: Serialize>(
        &self,
        collection: Collection,
        at: DateTime<Utc>,
        record: T,
    ) -> Result<Document<T>, StoreError> {
        let body = serde_json::to_value(&record)?;
        let id = DocumentId::generate();
        self.lock()?
            .entry(collection)
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                sort_key: sort_key(at),
                body,
            });
        Ok(Document { id, record })
    }

    fn load<T: DeserializeOwned>(
        &self,
        collection: Collection,
        ordering: Ordering,
        limit: Option<usize>,
    ) -> Result<Vec<Document<T>>, StoreError> {
        let mut stored = self
            .lock()?
            .get(&collection)
            .cloned()
            .unwrap_or_default();

        if ordering == Ordering::NewestFirst {
            // Reversed first so the stable sort keeps later inserts ahead on ties.
            stored.reverse();
            stored.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
        }

        stored
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|document| {
                Ok(Document {
                    id: document.id,
                    record: serde_json::from_value(document.body)?,
                })
            })
            .collect()
    }

    pub fn contacts(&self) -> Result<Vec<Document<ContactMessage>>, StoreError> {
        self.load(Collection::Contacts, Ordering::Inserted, None)
    }

    pub fn admissions(&self) -> Result<Vec<Document<AdmissionInquiry>>, StoreError> {
        self.load(Collection::Admissions, Ordering::Inserted, None)
    }

    /// Total number of documents across every collection.
    pub fn document_count(&self) -> usize {
        self.lock()
            .map(|guard| {
                Collection::ALL
                    .iter()
                    .map(|collection| guard.get(collection).map_or(0, Vec::len))
                    .sum()
            })
            .unwrap_or(0)
    }
}

impl InquiryRepository for MemoryStore {
    fn insert_contact(
        &self,
        message: ContactMessage,
    ) -> Result<Document<ContactMessage>, StoreError> {
        let at = message.created_at;
        self.insert(Collection::Contacts, at, message)
    }

    fn insert_admission(
        &self,
        inquiry: AdmissionInquiry,
    ) -> Result<Document<AdmissionInquiry>, StoreError> {
        let at = inquiry.created_at;
        self.insert(Collection::Admissions, at, inquiry)
    }
}

impl CatalogRepository for MemoryStore {
    fn list_fees(&self) -> Result<Vec<Document<FeeSchedule>>, StoreError> {
        self.load(Collection::Fees, Ordering::Inserted, None)
    }

    fn insert_fee(&self, fee: FeeSchedule) -> Result<Document<FeeSchedule>, StoreError> {
        self.insert(Collection::Fees, Utc::now(), fee)
    }

    fn recent_notices(&self, limit: usize) -> Result<Vec<Document<Notice>>, StoreError> {
        self.load(Collection::Notices, Ordering::NewestFirst, Some(limit))
    }

    fn insert_notice(&self, notice: Notice) -> Result<Document<Notice>, StoreError> {
        let at = notice.date;
        self.insert(Collection::Notices, at, notice)
    }
}
