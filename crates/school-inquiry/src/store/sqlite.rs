use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info};

use super::{sort_key, Collection, Document, DocumentId, Ordering, StoreError};
use crate::catalog::{CatalogRepository, FeeSchedule, Notice};
use crate::inquiries::{AdmissionInquiry, ContactMessage, InquiryRepository};

/// SQLite-backed document store. Each collection is a table of JSON bodies.
#[derive(Debug)]
pub struct SqliteStore {
    path: PathBuf,
    connection: Mutex<Option<Connection>>,
}

impl SqliteStore {
    /// Open the store, failing if the database cannot be reached.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let connection = establish(&path)?;
        Ok(Self {
            path,
            connection: Mutex::new(Some(connection)),
        })
    }

    /// Open the store, logging a failed connection instead of returning it.
    /// The next operation retries the connection.
    pub fn open_degraded(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let connection = match establish(&path) {
            Ok(connection) => {
                info!(path = %path.display(), "document store connected");
                Some(connection)
            }
            Err(err) => {
                error!(
                    path = %path.display(),
                    error = %err,
                    "document store connection failed; operations will fail until it is reachable"
                );
                None
            }
        };
        Self {
            path,
            connection: Mutex::new(connection),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    pub fn close(&self) -> Result<(), StoreError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        if let Some(connection) = guard.take() {
            connection.close().map_err(|(_, err)| StoreError::from(err))?;
            info!(path = %self.path.display(), "document store closed");
        }
        Ok(())
    }

    fn with_connection<R>(
        &self,
        op: impl FnOnce(&Connection) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;

        if guard.is_none() {
            *guard = Some(establish(&self.path)?);
            info!(path = %self.path.display(), "document store reconnected");
        }

        match guard.as_ref() {
            Some(connection) => op(connection),
            None => Err(StoreError::Unavailable("no connection".to_string())),
        }
    }

    fn insert<T: Serialize>(
        &self,
        collection: Collection,
        at: DateTime<Utc>,
        record: T,
    ) -> Result<Document<T>, StoreError> {
        let body = serde_json::to_string(&record)?;
        let id = DocumentId::generate();
        let sql = format!(
            "INSERT INTO {} (id, sort_key, body) VALUES (?1, ?2, ?3)",
            collection.name()
        );

        self.with_connection(|connection| {
            connection.execute(&sql, params![id.0, sort_key(at), body])?;
            Ok(())
        })?;

        Ok(Document { id, record })
    }

    fn load<T: DeserializeOwned>(
        &self,
        collection: Collection,
        ordering: Ordering,
        limit: Option<usize>,
    ) -> Result<Vec<Document<T>>, StoreError> {
        let order = match ordering {
            Ordering::Inserted => "rowid ASC",
            Ordering::NewestFirst => "sort_key DESC, rowid DESC",
        };
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit
            .map(|limit| i64::try_from(limit).unwrap_or(i64::MAX))
            .unwrap_or(-1);
        let sql = format!(
            "SELECT id, body FROM {} ORDER BY {} LIMIT ?1",
            collection.name(),
            order
        );

        let rows = self.with_connection(|connection| {
            let mut statement = connection.prepare(&sql)?;
            let mapped = statement.query_map(params![limit], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            let rows = mapped.collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        rows.into_iter()
            .map(|(id, body)| {
                Ok(Document {
                    id: DocumentId(id),
                    record: serde_json::from_str(&body)?,
                })
            })
            .collect()
    }
}

fn establish(path: &Path) -> Result<Connection, StoreError> {
    let connection = if path == Path::new(":memory:") {
        Connection::open_in_memory()
    } else {
        Connection::open(path)
    }
    .map_err(|err| StoreError::Unavailable(err.to_string()))?;

    for collection in Collection::ALL {
        connection.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                sort_key TEXT NOT NULL,
                body TEXT NOT NULL
            );",
            collection.name()
        ))?;
    }

    Ok(connection)
}

impl InquiryRepository for SqliteStore {
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

impl CatalogRepository for SqliteStore {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NoticePriority;
    use crate::inquiries::InquiryType;
    use chrono::Duration;

    fn contact() -> ContactMessage {
        ContactMessage {
            name: "Asha Verma".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            message: "Is transport available?".to_string(),
            inquiry_type: InquiryType::General,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn persists_documents_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("school.db");

        let stored = {
            let store = SqliteStore::open(&path).expect("open store");
            let stored = store.insert_contact(contact()).expect("insert contact");
            store.close().expect("close store");
            stored
        };

        let store = SqliteStore::open(&path).expect("reopen store");
        let fee = FeeSchedule {
            class_band: "Class I - V".to_string(),
            tuition_fee: 35000,
            transport_fee: 15000,
            other_fees: 8000,
            total: 58000,
            grade_ceiling: Some(5),
        };
        store.insert_fee(fee.clone()).expect("insert fee");
        let fees = store.list_fees().expect("list fees");
        assert_eq!(fees.len(), 1);
        assert_eq!(fees[0].record, fee);

        let rows: i64 = store
            .with_connection(|connection| {
                Ok(connection.query_row(
                    "SELECT COUNT(*) FROM contacts WHERE id = ?1",
                    params![stored.id.0],
                    |row| row.get(0),
                )?)
            })
            .expect("count contacts");
        assert_eq!(rows, 1);
    }

    #[test]
    fn notices_come_back_newest_first() {
        let store = SqliteStore::open(":memory:").expect("open in-memory store");
        let now = Utc::now();
        for (title, age) in [("older", 3), ("newest", 0), ("middle", 1)] {
            store
                .insert_notice(Notice {
                    title: title.to_string(),
                    content: "details".to_string(),
                    date: now - Duration::days(age),
                    priority: NoticePriority::Low,
                })
                .expect("insert notice");
        }

        let titles: Vec<String> = store
            .recent_notices(2)
            .expect("list notices")
            .into_iter()
            .map(|document| document.record.title)
            .collect();
        assert_eq!(titles, vec!["newest", "middle"]);
    }

    #[test]
    fn notices_sharing_a_date_list_latest_insert_first() {
        let store = SqliteStore::open(":memory:").expect("open in-memory store");
        let date = Utc::now();
        for title in ["first", "second", "third"] {
            store
                .insert_notice(Notice {
                    title: title.to_string(),
                    content: "details".to_string(),
                    date,
                    priority: NoticePriority::Medium,
                })
                .expect("insert notice");
        }

        let titles: Vec<String> = store
            .recent_notices(10)
            .expect("list notices")
            .into_iter()
            .map(|document| document.record.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[test]
    fn degraded_store_recovers_once_reachable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("not-yet-created");
        let store = SqliteStore::open_degraded(nested.join("school.db"));
        assert!(!store.is_connected());

        let err = store
            .insert_contact(contact())
            .expect_err("directory does not exist yet");
        assert!(matches!(err, StoreError::Unavailable(_)));

        std::fs::create_dir_all(&nested).expect("create directory");
        store
            .insert_contact(contact())
            .expect("insert succeeds after recovery");
        assert!(store.is_connected());
    }
}
