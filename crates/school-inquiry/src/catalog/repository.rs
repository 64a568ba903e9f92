use super::domain::{FeeSchedule, Notice};
use crate::store::{Document, StoreError};

/// Read-mostly reference data: fee schedules and notices.
pub trait CatalogRepository: Send + Sync {
    fn list_fees(&self) -> Result<Vec<Document<FeeSchedule>>, StoreError>;
    fn insert_fee(&self, fee: FeeSchedule) -> Result<Document<FeeSchedule>, StoreError>;
    /// Most recent notices by date, newest first.
    fn recent_notices(&self, limit: usize) -> Result<Vec<Document<Notice>>, StoreError>;
    fn insert_notice(&self, notice: Notice) -> Result<Document<Notice>, StoreError>;
}
