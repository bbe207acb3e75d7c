//! # zone-sync-provider
//!
//! Client library for the StackPath DNS API, the remote half of zone
//! synchronization.
//!
//! ## Features
//!
//! - OAuth2 client-credentials authentication at construction time
//! - Typed request/response shapes for zones, records and page metadata
//! - Cursor pagination over every listing ([`fetch_all`])
//! - Bulk record creation and deletion
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for static builds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zone_sync_provider::{ClientConfig, StackpathClient, ZoneApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Authenticate
//!     let config = ClientConfig::new("client-id", "client-secret", "my-stack");
//!     let client = StackpathClient::connect(config).await?;
//!
//!     // 2. List every zone, then every record of the first one
//!     let zones = client.list_all_zones(50).await?;
//!     for zone in &zones {
//!         println!("{} ({})", zone.domain, zone.id);
//!     }
//!     if let Some(zone) = zones.first() {
//!         for record in client.list_all_records(&zone.id, 50).await? {
//!             println!("{} {} {} {}", record.name, record.ttl, record.record_type, record.data);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError). Nothing
//! is retried: a failed call is reported once, with the HTTP status and the
//! provider's message when one was available.

mod client;
mod error;
mod http_client;
mod pagination;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export the client
pub use client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TOKEN_URL, StackpathClient};

// Re-export the API seam
pub use traits::ZoneApi;

// Re-export pagination
pub use pagination::{MAX_PAGE_SIZE, fetch_all};

// Re-export types
pub use types::{
    ApiResponse, FIRST_PAGE_CURSOR, NewRecord, Page, PageInfo, PageRequest, RemoteRecord,
    RemoteZone,
};

// Re-export utils
pub use utils::log_sanitizer::truncate_for_log;
