//! Business logic service layer

mod zone_sync_service;

pub use zone_sync_service::{
    DEFAULT_PAGE_SIZE, SaveSummary, SyncSettings, ZoneCommand, ZoneSyncService,
};
