//! Document persistence for inquiries, fee schedules, and notices.
//!
//! Every record kind lives in its own collection of JSON documents keyed by a
//! store-assigned [`DocumentId`]. Collections never reference each other.

mod memory;
mod sqlite;

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogRepository, FeeSchedule, Notice};
use crate::inquiries::{AdmissionInquiry, ContactMessage, InquiryRepository};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Identity assigned by the store when a document is inserted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored record with its identity flattened next to the record fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub record: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Collection {
    Contacts,
    Admissions,
    Fees,
    Notices,
}

impl Collection {
    pub(crate) const ALL: [Collection; 4] = [
        Collection::Contacts,
        Collection::Admissions,
        Collection::Fees,
        Collection::Notices,
    ];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Collection::Contacts => "contacts",
            Collection::Admissions => "admissions",
            Collection::Fees => "fees",
            Collection::Notices => "notices",
        }
    }
}

/// How documents in a collection are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ordering {
    Inserted,
    NewestFirst,
}

/// Fixed-width UTC timestamp so lexical and chronological order agree.
pub(crate) fn sort_key(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Run a blocking storage call on tokio's blocking pool.
pub async fn offload<T, E, F>(op: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(op).await.map_err(|err| {
        E::from(StoreError::Unavailable(format!(
            "storage task did not complete: {err}"
        )))
    })?
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    #[error("document store query failed: {0}")]
    Backend(String),
    #[error("stored document is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("unsupported store url '{0}'")]
    UnsupportedUrl(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Backend(value.to_string())
    }
}

/// Where a connection string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    Sqlite(PathBuf),
}

impl StoreLocation {
    pub fn parse(url: &str) -> Result<Self, StoreError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(StoreError::UnsupportedUrl(url.to_string()));
        }
        if url.eq_ignore_ascii_case("memory://") || url.eq_ignore_ascii_case("memory") {
            return Ok(Self::Memory);
        }
        if let Some(path) = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
        {
            if path.is_empty() {
                return Err(StoreError::UnsupportedUrl(url.to_string()));
            }
            return Ok(Self::Sqlite(PathBuf::from(path)));
        }
        if url.contains("://") {
            return Err(StoreError::UnsupportedUrl(url.to_string()));
        }
        Ok(Self::Sqlite(PathBuf::from(url)))
    }
}

/// Store handle injected into the HTTP services.
///
/// Opening never fails outright: an unreachable SQLite file yields a handle
/// whose operations report [`StoreError::Unavailable`] until the file can be
/// opened.
#[derive(Debug)]
pub enum DocumentStore {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl DocumentStore {
    pub fn connect(url: &str) -> Result<Self, StoreError> {
        match StoreLocation::parse(url)? {
            StoreLocation::Memory => {
                tracing::info!("using in-memory document store");
                Ok(Self::Memory(MemoryStore::default()))
            }
            StoreLocation::Sqlite(path) => Ok(Self::Sqlite(SqliteStore::open_degraded(path))),
        }
    }

    pub fn close(&self) -> Result<(), StoreError> {
        match self {
            DocumentStore::Memory(_) => Ok(()),
            DocumentStore::Sqlite(store) => store.close(),
        }
    }
}

impl InquiryRepository for DocumentStore {
    fn insert_contact(
        &self,
        message: ContactMessage,
    ) -> Result<Document<ContactMessage>, StoreError> {
        match self {
            DocumentStore::Memory(store) => store.insert_contact(message),
            DocumentStore::Sqlite(store) => store.insert_contact(message),
        }
    }

    fn insert_admission(
        &self,
        inquiry: AdmissionInquiry,
    ) -> Result<Document<AdmissionInquiry>, StoreError> {
        match self {
            DocumentStore::Memory(store) => store.insert_admission(inquiry),
            DocumentStore::Sqlite(store) => store.insert_admission(inquiry),
        }
    }
}

impl CatalogRepository for DocumentStore {
    fn list_fees(&self) -> Result<Vec<Document<FeeSchedule>>, StoreError> {
        match self {
            DocumentStore::Memory(store) => store.list_fees(),
            DocumentStore::Sqlite(store) => store.list_fees(),
        }
    }

    fn insert_fee(&self, fee: FeeSchedule) -> Result<Document<FeeSchedule>, StoreError> {
        match self {
            DocumentStore::Memory(store) => store.insert_fee(fee),
            DocumentStore::Sqlite(store) => store.insert_fee(fee),
        }
    }

    fn recent_notices(&self, limit: usize) -> Result<Vec<Document<Notice>>, StoreError> {
        match self {
            DocumentStore::Memory(store) => store.recent_notices(limit),
            DocumentStore::Sqlite(store) => store.recent_notices(limit),
        }
    }

    fn insert_notice(&self, notice: Notice) -> Result<Document<Notice>, StoreError> {
        match self {
            DocumentStore::Memory(store) => store.insert_notice(notice),
            DocumentStore::Sqlite(store) => store.insert_notice(notice),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn parses_supported_connection_strings() {
        assert_eq!(
            StoreLocation::parse("memory://").expect("memory url"),
            StoreLocation::Memory
        );
        assert_eq!(
            StoreLocation::parse("sqlite://data/school.db").expect("sqlite url"),
            StoreLocation::Sqlite(PathBuf::from("data/school.db"))
        );
        assert_eq!(
            StoreLocation::parse("school.db").expect("bare path"),
            StoreLocation::Sqlite(PathBuf::from("school.db"))
        );
    }

    #[test]
    fn rejects_foreign_schemes() {
        let err = StoreLocation::parse("mongodb://localhost:27017/school")
            .expect_err("mongodb is not supported");
        assert!(matches!(err, StoreError::UnsupportedUrl(_)));
    }

    #[test]
    fn sort_keys_order_chronologically() {
        let earlier = DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z")
            .expect("valid")
            .with_timezone(&Utc);
        let later = DateTime::parse_from_rfc3339("2024-03-01T10:00:00.5Z")
            .expect("valid")
            .with_timezone(&Utc);
        assert!(sort_key(earlier) < sort_key(later));
    }

    #[tokio::test]
    async fn offload_returns_the_storage_result() {
        let store = Arc::new(MemoryStore::default());
        let shared = store.clone();
        let stored = offload(move || {
            shared.insert_fee(FeeSchedule {
                class_band: "Nursery - UKG".to_string(),
                tuition_fee: 1,
                transport_fee: 1,
                other_fees: 1,
                total: 3,
                grade_ceiling: Some(0),
            })
        })
        .await
        .expect("insert on blocking pool");
        assert_eq!(store.list_fees().expect("fees")[0].id, stored.id);
    }

    #[tokio::test]
    async fn offload_reports_a_panicked_task_as_unavailable() {
        let err = offload::<(), StoreError, _>(|| panic!("disk vanished"))
            .await
            .expect_err("panic surfaces as an error");
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn document_serializes_identity_as_underscore_id() {
        let document = Document {
            id: DocumentId("abc".to_string()),
            record: serde_json::json!({ "title": "Sports Day" }),
        };
        let value = serde_json::to_value(&document).expect("serializes");
        assert_eq!(value["_id"], "abc");
        assert_eq!(value["title"], "Sports Day");
    }
}
