use crate::error::FetchError;
use async_trait::async_trait;
use model::{
    core::run_date::RunDate,
    records::page::{Page, PageWindow},
};

/// Something that can return one window of records for a run date.
///
/// Implementations issue exactly one request per call and never retry;
/// the caller owns any retry policy.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, run_date: RunDate, window: PageWindow) -> Result<Page, FetchError>;
}
