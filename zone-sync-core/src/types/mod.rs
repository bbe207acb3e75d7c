//! Type definition module

mod record;
mod response;

pub use record::{LocalRecord, RecordData, RecordType, TrailingDotType};
pub use response::{OperationResult, StatusCode};

// Re-export the provider's wire types
pub use zone_sync_provider::{NewRecord, RemoteRecord, RemoteZone};
