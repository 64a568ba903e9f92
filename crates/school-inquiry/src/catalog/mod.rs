//! Fee schedules and notices published on the public site.

pub mod domain;
pub mod fallback;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{FeeSchedule, Notice, NoticePriority, NoticeRequest, HIGHEST_OFFERED_STANDARD};
pub use fallback::{FallbackData, FallbackError, SampleNotice};
pub use repository::CatalogRepository;
pub use router::catalog_router;
pub use service::{CatalogError, CatalogService, SeedSummary, NOTICE_LIMIT};
