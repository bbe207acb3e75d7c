//! Zone Sync Core Library
//!
//! The reconciliation engine behind zone-sync:
//! - Remote cache of every zone and record in a stack
//! - Record normalization into the provider's flattened shape
//! - Diffing a local zone file against the cache
//! - Chunked bulk deletion and creation
//!
//! The provider is reached only through the [`ZoneApi`] trait, so the
//! engine runs the same against the live client and an in-memory double.

pub mod bulk;
pub mod cache;
pub mod error;
pub mod normalize;
pub mod reconcile;
pub mod services;
pub mod types;
pub mod utils;
pub mod zonefile;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use bulk::{BulkExecutor, BulkReport, DEFAULT_BULK_LIMIT};
pub use cache::RemoteCache;
pub use error::{CoreError, CoreResult};
pub use reconcile::{ZoneDiff, diff_zone};
pub use services::{SaveSummary, SyncSettings, ZoneCommand, ZoneSyncService};
pub use types::{OperationResult, StatusCode};
pub use zone_sync_provider::ZoneApi;
pub use zonefile::{BasicZoneParser, ZoneFileError, ZoneFileParser, render_zone};
