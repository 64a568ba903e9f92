use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{FeeSchedule, Notice, NoticeRequest};
use super::fallback::FallbackData;
use super::repository::CatalogRepository;
use crate::store::{Document, StoreError};

/// Maximum number of notices returned by a read.
pub const NOTICE_LIMIT: usize = 10;

pub struct CatalogService<R> {
    repository: Arc<R>,
    fallback: Arc<FallbackData>,
}

/// Counts of documents written by [`CatalogService::seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub fees: usize,
    pub notices: usize,
}

impl<R> CatalogService<R>
where
    R: CatalogRepository + 'static,
{
    pub fn new(repository: Arc<R>, fallback: Arc<FallbackData>) -> Self {
        Self {
            repository,
            fallback,
        }
    }

    /// Stored fee schedules (or the fallback table), limited to offered grades.
    pub fn fees(&self) -> Result<Vec<Document<FeeSchedule>>, CatalogError> {
        let mut fees = self.repository.list_fees()?;
        if fees.is_empty() {
            fees = self.fallback.fee_documents();
        }
        fees.retain(|fee| fee.record.is_offered());
        Ok(fees)
    }

    /// Up to [`NOTICE_LIMIT`] notices, newest first, or the samples when none exist.
    pub fn notices(&self, now: DateTime<Utc>) -> Result<Vec<Document<Notice>>, CatalogError> {
        let notices = self.repository.recent_notices(NOTICE_LIMIT)?;
        if notices.is_empty() {
            return Ok(self.fallback.notice_documents(now, NOTICE_LIMIT));
        }
        Ok(notices)
    }

    pub fn publish_notice(
        &self,
        request: NoticeRequest,
        now: DateTime<Utc>,
    ) -> Result<Document<Notice>, CatalogError> {
        let notice = request
            .into_notice(now)
            .ok_or(CatalogError::IncompleteNotice)?;
        let stored = self.repository.insert_notice(notice)?;
        info!(id = %stored.id, priority = ?stored.record.priority, "notice published");
        Ok(stored)
    }

    /// Copy the fallback dataset into the store. A collection that already
    /// holds documents is left alone, so seeding twice writes nothing new.
    pub fn seed(&self, now: DateTime<Utc>) -> Result<SeedSummary, CatalogError> {
        let mut summary = SeedSummary { fees: 0, notices: 0 };
        if self.repository.list_fees()?.is_empty() {
            for fee in &self.fallback.fees {
                self.repository.insert_fee(fee.record.clone())?;
                summary.fees += 1;
            }
        } else {
            info!("fees already stored; skipping fee seed");
        }
        if self.repository.recent_notices(1)?.is_empty() {
            for sample in &self.fallback.notices {
                self.repository.insert_notice(sample.dated(now))?;
                summary.notices += 1;
            }
        } else {
            info!("notices already stored; skipping notice seed");
        }
        info!(fees = summary.fees, notices = summary.notices, "store seeded");
        Ok(summary)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Title and content are required")]
    IncompleteNotice,
    #[error(transparent)]
    Store(#[from] StoreError),
}
