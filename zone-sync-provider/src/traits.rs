use async_trait::async_trait;

use crate::error::Result;
use crate::pagination::fetch_all;
use crate::types::{NewRecord, Page, PageRequest, RemoteRecord, RemoteZone};

/// DNS zone API seam.
///
/// The sync engine talks to the provider only through this trait, which keeps
/// it testable against an in-memory implementation. Required methods map one
/// to one onto REST calls; the `list_all_*` helpers walk every page.
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// Fetch one page of zones in the stack.
    async fn list_zones_page(&self, page: &PageRequest) -> Result<Page<RemoteZone>>;

    /// Fetch one page of records in a zone.
    async fn list_records_page(
        &self,
        zone_id: &str,
        page: &PageRequest,
    ) -> Result<Page<RemoteRecord>>;

    /// Provision a new zone for `domain`.
    async fn create_zone(&self, domain: &str) -> Result<RemoteZone>;

    /// Delete a zone and all its records.
    async fn delete_zone(&self, zone_id: &str) -> Result<()>;

    /// Create records in one bulk call.
    ///
    /// The caller is responsible for staying under the bulk limit.
    async fn bulk_create_records(&self, zone_id: &str, records: &[NewRecord]) -> Result<()>;

    /// Delete records by id in one bulk call.
    ///
    /// The caller is responsible for staying under the bulk limit.
    async fn bulk_delete_records(&self, zone_id: &str, record_ids: &[String]) -> Result<()>;

    /// Fetch every zone in the stack, following cursors until exhausted.
    async fn list_all_zones(&self, page_size: u32) -> Result<Vec<RemoteZone>> {
        fetch_all(page_size, |req| async move { self.list_zones_page(&req).await }).await
    }

    /// Fetch every record in a zone, following cursors until exhausted.
    async fn list_all_records(&self, zone_id: &str, page_size: u32) -> Result<Vec<RemoteRecord>> {
        fetch_all(page_size, |req| async move {
            self.list_records_page(zone_id, &req).await
        })
        .await
    }
}
