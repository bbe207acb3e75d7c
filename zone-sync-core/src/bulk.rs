//! Chunked bulk mutation
//!
//! Deletions go first, then creations, each cut into chunks of at most
//! `limit` items and sent one after another. The first rejected chunk stops
//! the run; chunks already applied stay applied.

use serde::Serialize;
use zone_sync_provider::ZoneApi;

use crate::error::{BulkAction, CoreError, CoreResult};
use crate::reconcile::ZoneDiff;

/// Largest number of records the provider accepts per bulk call.
pub const DEFAULT_BULK_LIMIT: usize = 1000;

/// Counts of what a successful [`BulkExecutor::apply`] sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    pub deleted: usize,
    pub created: usize,
    /// Number of bulk calls issued.
    pub chunks: usize,
}

/// Sends a [`ZoneDiff`] through the bulk endpoints.
pub struct BulkExecutor<'a> {
    api: &'a dyn ZoneApi,
    limit: usize,
}

impl<'a> BulkExecutor<'a> {
    /// `limit` is clamped to at least one item per chunk.
    pub fn new(api: &'a dyn ZoneApi, limit: usize) -> Self {
        Self {
            api,
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Apply `diff` to zone `zone_id`; `domain` only labels logs and errors.
    ///
    /// # Errors
    ///
    /// [`CoreError::BulkChunkFailed`] for the first chunk the provider rejects.
    pub async fn apply(&self, domain: &str, zone_id: &str, diff: &ZoneDiff) -> CoreResult<BulkReport> {
        let mut report = BulkReport::default();

        let total = diff.deletions.len().div_ceil(self.limit);
        for (idx, chunk) in diff.deletions.chunks(self.limit).enumerate() {
            self.api
                .bulk_delete_records(zone_id, chunk)
                .await
                .map_err(|source| CoreError::BulkChunkFailed {
                    zone: domain.to_string(),
                    action: BulkAction::Delete,
                    chunk: idx + 1,
                    total,
                    source,
                })?;
            log::info!(
                "[{domain}] deleted {} records (chunk {}/{total})",
                chunk.len(),
                idx + 1
            );
            report.deleted += chunk.len();
            report.chunks += 1;
        }

        let total = diff.additions.len().div_ceil(self.limit);
        for (idx, chunk) in diff.additions.chunks(self.limit).enumerate() {
            self.api
                .bulk_create_records(zone_id, chunk)
                .await
                .map_err(|source| CoreError::BulkChunkFailed {
                    zone: domain.to_string(),
                    action: BulkAction::Create,
                    chunk: idx + 1,
                    total,
                    source,
                })?;
            log::info!(
                "[{domain}] created {} records (chunk {}/{total})",
                chunk.len(),
                idx + 1
            );
            report.created += chunk.len();
            report.chunks += 1;
        }

        Ok(report)
    }
}
