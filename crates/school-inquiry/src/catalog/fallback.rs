use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use super::domain::{FeeSchedule, Notice, NoticePriority};
use crate::store::{Document, DocumentId};

/// Reference data served while the store holds no fees or notices, and the
/// source for the `seed` command.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FallbackData {
    #[serde(default)]
    pub fees: Vec<Document<FeeSchedule>>,
    #[serde(default)]
    pub notices: Vec<SampleNotice>,
}

/// A notice whose date is expressed relative to the moment it is served.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleNotice {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub priority: NoticePriority,
    #[serde(default)]
    pub age_days: i64,
}

impl SampleNotice {
    pub fn dated(&self, now: DateTime<Utc>) -> Notice {
        Notice {
            title: self.title.clone(),
            content: self.content.clone(),
            date: now - Duration::days(self.age_days),
            priority: self.priority,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FallbackError {
    #[error("unable to read fallback data: {0}")]
    Io(#[from] std::io::Error),
    #[error("fallback data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FallbackData {
    pub fn from_json(raw: &str) -> Result<Self, FallbackError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, FallbackError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Load the dataset, serving nothing when the file is absent or broken.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(data) => {
                info!(
                    path = %path.display(),
                    fees = data.fees.len(),
                    notices = data.notices.len(),
                    "fallback data loaded"
                );
                data
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "fallback data unavailable");
                Self::default()
            }
        }
    }

    pub fn fee_documents(&self) -> Vec<Document<FeeSchedule>> {
        self.fees.clone()
    }

    /// Sample notices resolved against `now`, newest first.
    pub fn notice_documents(&self, now: DateTime<Utc>, limit: usize) -> Vec<Document<Notice>> {
        let mut notices: Vec<Document<Notice>> = self
            .notices
            .iter()
            .map(|sample| Document {
                id: sample.id.clone(),
                record: sample.dated(now),
            })
            .collect();
        notices.sort_by(|a, b| b.record.date.cmp(&a.record.date));
        notices.truncate(limit);
        notices
    }
}
