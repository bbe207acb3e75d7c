//! Zone synchronization service

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use zone_sync_provider::{MAX_PAGE_SIZE, ZoneApi};

use crate::bulk::{BulkExecutor, BulkReport, DEFAULT_BULK_LIMIT};
use crate::cache::RemoteCache;
use crate::error::{CoreError, CoreResult};
use crate::reconcile::diff_zone;
use crate::types::{OperationResult, RemoteZone};
use crate::utils::domain::{normalize_domain, split_zone_list};
use crate::zonefile::{ZoneFileParser, render_zone};

/// Default number of items requested per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Tunables for listing and bulk mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    pub page_size: u32,
    pub bulk_limit: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            bulk_limit: DEFAULT_BULK_LIMIT,
        }
    }
}

impl SyncSettings {
    /// # Errors
    ///
    /// [`CoreError::ValidationError`] if either value is outside `1..=1000`.
    pub fn validate(&self) -> CoreResult<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(CoreError::ValidationError(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.bulk_limit == 0 || self.bulk_limit > DEFAULT_BULK_LIMIT {
            return Err(CoreError::ValidationError(format!(
                "bulk_limit must be between 1 and {DEFAULT_BULK_LIMIT}, got {}",
                self.bulk_limit
            )));
        }
        Ok(())
    }
}

/// Result of one zone save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSummary {
    pub domain: String,
    pub zone_id: String,
    /// The zone did not exist remotely and was provisioned first.
    pub zone_created: bool,
    pub report: BulkReport,
}

impl std::fmt::Display for SaveSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.zone_created {
            write!(f, "Zone {} created; ", self.domain)?;
        }
        if self.report.chunks == 0 {
            write!(f, "zone {} already in sync", self.domain)
        } else {
            write!(
                f,
                "zone {} saved: {} deleted, {} created in {} bulk call(s)",
                self.domain, self.report.deleted, self.report.created, self.report.chunks
            )
        }
    }
}

/// An inbound operation from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneCommand {
    SaveZone { zone: String, zonedata: String },
    AddZoneConf { zone: String },
    RemoveZone { zone: String },
    /// Comma-separated domain list.
    RemoveZones { zones: String },
    GetZone { zone: String },
    /// Comma-separated domain list.
    GetZones { zones: String },
    GetAllZones,
    GetZoneList,
    ZoneExists { zone: String },
    GetNameservers,
    /// `(zone, zonedata)` pairs saved in order.
    SyncZones { zones: Vec<(String, String)> },
    Refresh,
}

impl ZoneCommand {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SaveZone { .. } => "save_zone",
            Self::AddZoneConf { .. } => "add_zone_conf",
            Self::RemoveZone { .. } => "remove_zone",
            Self::RemoveZones { .. } => "remove_zones",
            Self::GetZone { .. } => "get_zone",
            Self::GetZones { .. } => "get_zones",
            Self::GetAllZones => "get_all_zones",
            Self::GetZoneList => "get_zone_list",
            Self::ZoneExists { .. } => "zone_exists",
            Self::GetNameservers => "get_nameservers",
            Self::SyncZones { .. } => "sync_zones",
            Self::Refresh => "refresh",
        }
    }
}

/// Synchronizes local zone files into the remote provider.
///
/// Holds the remote cache for the whole session. Operations on the same
/// domain are serialized; different domains may run concurrently. A full
/// [`refresh`](Self::refresh) excludes every zone operation.
pub struct ZoneSyncService {
    api: Arc<dyn ZoneApi>,
    parser: Arc<dyn ZoneFileParser>,
    cache: RwLock<RemoteCache>,
    /// Shared by zone operations, exclusive for a full refresh.
    cache_gate: RwLock<()>,
    zone_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    settings: SyncSettings,
}

impl ZoneSyncService {
    /// Build the service and load the full remote cache.
    pub async fn bootstrap(
        api: Arc<dyn ZoneApi>,
        parser: Arc<dyn ZoneFileParser>,
        settings: SyncSettings,
    ) -> CoreResult<Self> {
        settings.validate()?;
        let cache = RemoteCache::load(api.as_ref(), settings.page_size).await?;
        Ok(Self::with_cache(api, parser, cache, settings))
    }

    /// Build the service over an already-loaded cache.
    #[must_use]
    pub fn with_cache(
        api: Arc<dyn ZoneApi>,
        parser: Arc<dyn ZoneFileParser>,
        cache: RemoteCache,
        settings: SyncSettings,
    ) -> Self {
        Self {
            api,
            parser,
            cache: RwLock::new(cache),
            cache_gate: RwLock::new(()),
            zone_locks: Mutex::new(HashMap::new()),
            settings,
        }
    }

    pub fn settings(&self) -> SyncSettings {
        self.settings
    }

    // ============ Dispatch ============

    /// Run one inbound command and fold the outcome into `(status, message)`.
    ///
    /// Failures are logged here: expected ones at `warn`, the rest at `error`.
    pub async fn execute(&self, command: ZoneCommand) -> OperationResult {
        let name = command.name();
        log::debug!("Executing {name}");

        let result = match command {
            ZoneCommand::SaveZone { zone, zonedata } => self
                .save_zone(&zone, &zonedata)
                .await
                .map(|summary| summary.to_string()),
            ZoneCommand::AddZoneConf { zone } => self.add_zone_conf(&zone).await.map(|created| {
                let domain = normalize_domain(&zone);
                if created {
                    format!("Zone {domain} created")
                } else {
                    format!("Zone {domain} already exists")
                }
            }),
            ZoneCommand::RemoveZone { zone } => self
                .remove_zone(&zone)
                .await
                .map(|()| format!("Zone {} removed", normalize_domain(&zone))),
            ZoneCommand::RemoveZones { zones } => self
                .remove_zones(&zones)
                .await
                .map(|count| format!("Removed {count} zone(s)")),
            ZoneCommand::GetZone { zone } => self.get_zone(&zone).await,
            ZoneCommand::GetZones { zones } => self.get_zones(&zones).await,
            ZoneCommand::GetAllZones => Ok(self.get_all_zones().await),
            ZoneCommand::GetZoneList => Ok(self.get_zone_list().await.join("\n")),
            ZoneCommand::ZoneExists { zone } => self
                .zone_exists(&zone)
                .await
                .map(|exists| if exists { "1" } else { "0" }.to_string()),
            ZoneCommand::GetNameservers => Ok(self.get_nameservers().await.join("\n")),
            ZoneCommand::SyncZones { zones } => self
                .sync_zones(&zones)
                .await
                .map(|summaries| format!("Synchronized {} zone(s)", summaries.len())),
            ZoneCommand::Refresh => self
                .refresh()
                .await
                .map(|count| format!("Cache refreshed: {count} zone(s)")),
        };

        if let Err(e) = &result {
            if e.is_expected() {
                log::warn!("{name} failed: {e}");
            } else {
                log::error!("{name} failed: {e}");
            }
        }
        result.into()
    }

    // ============ Zone save ============

    /// Make the remote zone match `zonedata`.
    ///
    /// Locate (creating the zone if missing), parse, diff, delete, create,
    /// then refresh the zone's cached records from the provider.
    pub async fn save_zone(&self, zone: &str, zonedata: &str) -> CoreResult<SaveSummary> {
        let domain = require(zone, "zone")?;
        require(zonedata, "zonedata")?;

        let _shared = self.cache_gate.read().await;
        let lock = self.zone_lock(&domain).await;
        let _guard = lock.lock().await;

        let (zone_id, zone_created) = self.ensure_zone(&domain).await?;

        let local = self
            .parser
            .parse(&domain, zonedata)
            .map_err(|source| CoreError::ZoneFileParse {
                zone: domain.clone(),
                source,
            })?;
        log::debug!("[{domain}] parsed {} local records", local.len());

        let diff = {
            let cache = self.cache.read().await;
            let cached = cache
                .get(&zone_id)
                .ok_or_else(|| CoreError::ZoneNotFound(domain.clone()))?;
            diff_zone(cached, &local)
        };

        if diff.is_empty() {
            log::info!("[{domain}] already in sync");
            return Ok(SaveSummary {
                domain,
                zone_id,
                zone_created,
                report: BulkReport::default(),
            });
        }
        log::info!(
            "[{domain}] {} deletion(s), {} addition(s)",
            diff.deletions.len(),
            diff.additions.len()
        );

        let executor = BulkExecutor::new(self.api.as_ref(), self.settings.bulk_limit);
        let applied = executor.apply(&domain, &zone_id, &diff).await;

        // Chunks may have landed even if a later one failed
        let refreshed = self.refresh_zone_records(&zone_id).await;
        let report = applied?;
        refreshed?;

        Ok(SaveSummary {
            domain,
            zone_id,
            zone_created,
            report,
        })
    }

    /// Save several zones in order, stopping at the first failure.
    pub async fn sync_zones(&self, zones: &[(String, String)]) -> CoreResult<Vec<SaveSummary>> {
        if zones.is_empty() {
            return Err(CoreError::ValidationError("zones is required".to_string()));
        }
        let mut summaries = Vec::with_capacity(zones.len());
        for (zone, zonedata) in zones {
            summaries.push(self.save_zone(zone, zonedata).await?);
        }
        Ok(summaries)
    }

    // ============ Zone lifecycle ============

    /// Ensure `zone` exists remotely. Returns `true` if it had to be created.
    pub async fn add_zone_conf(&self, zone: &str) -> CoreResult<bool> {
        let domain = require(zone, "zone")?;
        let _shared = self.cache_gate.read().await;
        let lock = self.zone_lock(&domain).await;
        let _guard = lock.lock().await;
        let (_, created) = self.ensure_zone(&domain).await?;
        Ok(created)
    }

    /// Delete `zone` remotely, then drop it from the cache.
    pub async fn remove_zone(&self, zone: &str) -> CoreResult<()> {
        let domain = require(zone, "zone")?;
        let _shared = self.cache_gate.read().await;
        let lock = self.zone_lock(&domain).await;
        let _guard = lock.lock().await;

        let zone_id = {
            let cache = self.cache.read().await;
            cache
                .find_zone(&domain)?
                .map(|z| z.id.clone())
                .ok_or_else(|| CoreError::ZoneNotFound(domain.clone()))?
        };

        self.api.delete_zone(&zone_id).await?;
        self.cache.write().await.remove_zone(&zone_id);
        log::info!("[{domain}] zone {zone_id} removed");
        Ok(())
    }

    /// Remove each zone of a comma-separated list, stopping at the first failure.
    pub async fn remove_zones(&self, zones: &str) -> CoreResult<usize> {
        let list = require_list(zones)?;
        for zone in &list {
            self.remove_zone(zone).await?;
        }
        Ok(list.len())
    }

    // ============ Queries ============

    /// Render one zone from the cache.
    pub async fn get_zone(&self, zone: &str) -> CoreResult<String> {
        let domain = require(zone, "zone")?;
        let cache = self.cache.read().await;
        cache
            .find_zone(&domain)?
            .map(render_zone)
            .ok_or(CoreError::ZoneNotFound(domain))
    }

    /// Render each zone of a comma-separated list.
    pub async fn get_zones(&self, zones: &str) -> CoreResult<String> {
        let mut rendered = Vec::new();
        for zone in require_list(zones)? {
            rendered.push(self.get_zone(&zone).await?);
        }
        Ok(rendered.join("\n"))
    }

    /// Render every cached zone.
    pub async fn get_all_zones(&self) -> String {
        let cache = self.cache.read().await;
        cache
            .list_zones()
            .iter()
            .map(render_zone)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Domains of every cached zone.
    pub async fn get_zone_list(&self) -> Vec<String> {
        let cache = self.cache.read().await;
        cache.list_zones().iter().map(|z| z.domain.clone()).collect()
    }

    pub async fn zone_exists(&self, zone: &str) -> CoreResult<bool> {
        let domain = require(zone, "zone")?;
        Ok(self.cache.read().await.find_zone(&domain)?.is_some())
    }

    /// Deduplicated nameservers across all cached zones.
    pub async fn get_nameservers(&self) -> Vec<String> {
        self.cache.read().await.list_nameservers()
    }

    /// Cached copy of a zone.
    pub async fn cached_zone(&self, zone: &str) -> CoreResult<Option<RemoteZone>> {
        let domain = require(zone, "zone")?;
        Ok(self.cache.read().await.find_zone(&domain)?.cloned())
    }

    /// Rebuild the whole cache from the provider. Returns the zone count.
    ///
    /// The current cache stays in place if the fetch fails. Zone operations
    /// wait until the new cache is installed.
    pub async fn refresh(&self) -> CoreResult<usize> {
        let _exclusive = self.cache_gate.write().await;
        let fresh = RemoteCache::load(self.api.as_ref(), self.settings.page_size).await?;
        let count = fresh.len();
        *self.cache.write().await = fresh;
        Ok(count)
    }

    // ============ Helpers ============

    async fn zone_lock(&self, domain: &str) -> Arc<Mutex<()>> {
        let mut locks = self.zone_locks.lock().await;
        // Entries nobody holds or waits on
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry(normalize_domain(domain))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Find the zone in the cache or provision it. Caller holds the zone lock.
    async fn ensure_zone(&self, domain: &str) -> CoreResult<(String, bool)> {
        if let Some(zone) = self.cache.read().await.find_zone(domain)? {
            return Ok((zone.id.clone(), false));
        }

        let mut zone = self.api.create_zone(domain).await?;
        log::info!("[{domain}] created zone {}", zone.id);
        zone.records = self
            .api
            .list_all_records(&zone.id, self.settings.page_size)
            .await?;
        let zone_id = zone.id.clone();
        self.cache.write().await.add_zone(zone);
        Ok((zone_id, true))
    }

    async fn refresh_zone_records(&self, zone_id: &str) -> CoreResult<()> {
        let records = self
            .api
            .list_all_records(zone_id, self.settings.page_size)
            .await?;
        log::debug!("Refreshed {} records for zone {zone_id}", records.len());
        self.cache.write().await.replace_records(zone_id, records);
        Ok(())
    }
}

/// Normalized non-blank domain, or a validation error naming `field`.
fn require(value: &str, field: &str) -> CoreResult<String> {
    if value.trim().is_empty() {
        return Err(CoreError::ValidationError(format!("{field} is required")));
    }
    Ok(normalize_domain(value))
}

fn require_list(zones: &str) -> CoreResult<Vec<String>> {
    let list = split_zone_list(zones);
    if list.is_empty() {
        return Err(CoreError::ValidationError("zones is required".to_string()));
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BulkAction;
    use crate::test_utils::{ApiCall, MockZoneApi, a_records, record};
    use crate::types::StatusCode;
    use crate::zonefile::BasicZoneParser;

    const ZONE: &str = "$TTL 300
@       IN NS    ns1.mock.net.
@       IN NS    ns2.mock.net.
@       IN A     192.0.2.1
www     IN CNAME @
@  3600 IN MX    10 mail
mail    IN A     192.0.2.25
_sip._tcp IN SRV 10 20 5060 sip
@       IN TXT   \"v=spf1 mx -all\"
@       IN CAA   0 issue \"letsencrypt.org\"
";

    async fn service(api: &Arc<MockZoneApi>) -> ZoneSyncService {
        ZoneSyncService::bootstrap(
            api.clone(),
            Arc::new(BasicZoneParser::new()),
            SyncSettings::default(),
        )
        .await
        .unwrap()
    }

    fn bulk_sizes(api: &MockZoneApi) -> Vec<usize> {
        api.calls()
            .iter()
            .filter_map(|c| match c {
                ApiCall::BulkCreate { count, .. } | ApiCall::BulkDelete { count, .. } => Some(*count),
                _ => None,
            })
            .collect()
    }

    // ---- save_zone ----

    #[tokio::test]
    async fn save_creates_missing_zone_and_records() {
        let api = Arc::new(MockZoneApi::new());
        let svc = service(&api).await;

        let summary = svc.save_zone("Example.com.", ZONE).await.unwrap();
        assert!(summary.zone_created);
        assert_eq!(summary.domain, "example.com");
        // NS lines match the zone's nameservers; CAA is not synchronized
        assert_eq!(summary.report.created, 6);
        assert_eq!(summary.report.deleted, 0);

        let zone = svc.cached_zone("example.com").await.unwrap().unwrap();
        assert_eq!(zone.records.len(), 6);
        assert!(zone.records.iter().all(|r| r.id.starts_with("rec-")));
        assert_eq!(zone.records, api.records(&zone.id));
    }

    #[tokio::test]
    async fn second_save_is_a_no_op() {
        let api = Arc::new(MockZoneApi::new());
        let svc = service(&api).await;

        svc.save_zone("example.com", ZONE).await.unwrap();
        api.clear_calls();
        let summary = svc.save_zone("example.com", ZONE).await.unwrap();

        assert!(!summary.zone_created);
        assert_eq!(summary.report, BulkReport::default());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn save_replaces_changed_and_removes_stale_records() {
        let api = Arc::new(MockZoneApi::new());
        let zone_id = api.seed_zone("example.com");
        api.seed_records(
            &zone_id,
            vec![
                record("", "@", "A", 300, "192.0.2.1"),
                record("", "old", "A", 300, "192.0.2.99"),
                record("", "www", "CNAME", 600, "example.com."),
                record("", "@", "NS", 3600, "ns1.mock.net."),
            ],
        );
        let svc = service(&api).await;

        let text = "$TTL 300\n@ A 192.0.2.1\nwww CNAME @\n";
        let summary = svc.save_zone("example.com", text).await.unwrap();
        assert!(!summary.zone_created);
        assert_eq!(summary.report.deleted, 2);
        assert_eq!(summary.report.created, 1);

        let remaining = api.records(&zone_id);
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().any(|r| r.record_type == "NS"));
        assert!(remaining.iter().all(|r| r.name != "old"));
        let cached = svc.cached_zone("example.com").await.unwrap().unwrap();
        assert_eq!(cached.records, remaining);
    }

    #[tokio::test]
    async fn large_save_is_chunked_and_stops_on_failure() {
        let api = Arc::new(MockZoneApi::new());
        api.seed_zone("example.com");
        let svc = service(&api).await;

        let mut text = String::from("$TTL 300\n");
        for i in 0..2500 {
            text.push_str(&format!("host{i} A 192.0.2.1\n"));
        }
        api.fail_bulk_call(2);

        let err = svc.save_zone("example.com", &text).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::BulkChunkFailed {
                action: BulkAction::Create,
                chunk: 2,
                total: 3,
                ..
            }
        ));
        assert_eq!(bulk_sizes(&api), vec![1000, 1000]);

        // The first chunk landed and the cache reflects it
        let cached = svc.cached_zone("example.com").await.unwrap().unwrap();
        assert_eq!(cached.records.len(), 1000);
    }

    #[tokio::test]
    async fn large_save_uses_three_chunks() {
        let api = Arc::new(MockZoneApi::new());
        api.seed_zone("example.com");
        let svc = service(&api).await;

        let mut text = String::from("$TTL 300\n");
        for i in 0..2500 {
            text.push_str(&format!("host{i} A 192.0.2.1\n"));
        }
        let summary = svc.save_zone("example.com", &text).await.unwrap();
        assert_eq!(summary.report.chunks, 3);
        assert_eq!(bulk_sizes(&api), vec![1000, 1000, 500]);
    }

    #[tokio::test]
    async fn parse_failure_is_logged_failure_after_zone_creation() {
        let api = Arc::new(MockZoneApi::new());
        let svc = service(&api).await;

        let result = svc
            .execute(ZoneCommand::SaveZone {
                zone: "example.com".to_string(),
                zonedata: "$TTL 300\nwww A not-an-address\n".to_string(),
            })
            .await;
        assert_eq!(result.status, StatusCode::FailureLogged);
        assert!(result.message.contains("line 2"));
        // Locate runs before Parse, so the zone exists now
        assert!(svc.zone_exists("example.com").await.unwrap());
        assert_eq!(api.zone_count(), 1);
    }

    #[tokio::test]
    async fn ambiguous_zone_is_refused() {
        let api = Arc::new(MockZoneApi::new());
        api.seed_zone("example.com");
        api.seed_zone("EXAMPLE.com");
        let svc = service(&api).await;
        api.clear_calls();

        let err = svc.save_zone("example.com", ZONE).await.unwrap_err();
        assert!(matches!(err, CoreError::AmbiguousZone { count: 2, .. }));
        assert!(matches!(
            svc.remove_zone("example.com").await,
            Err(CoreError::AmbiguousZone { .. })
        ));
        assert!(matches!(
            svc.get_zone("example.com").await,
            Err(CoreError::AmbiguousZone { .. })
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_inputs_are_validation_errors() {
        let api = Arc::new(MockZoneApi::new());
        let svc = service(&api).await;

        assert!(matches!(
            svc.save_zone(" ", ZONE).await,
            Err(CoreError::ValidationError(_))
        ));
        assert!(matches!(
            svc.save_zone("example.com", "").await,
            Err(CoreError::ValidationError(_))
        ));
        assert!(matches!(
            svc.remove_zones(" , ").await,
            Err(CoreError::ValidationError(_))
        ));
        assert_eq!(api.zone_count(), 0);
    }

    #[tokio::test]
    async fn failed_zone_creation_leaves_cache_untouched() {
        let api = Arc::new(MockZoneApi::new());
        let svc = service(&api).await;
        api.fail_create_zone();

        let err = svc.add_zone_conf("example.com").await.unwrap_err();
        assert!(matches!(err, CoreError::Provider(_)));
        assert!(!svc.zone_exists("example.com").await.unwrap());
    }

    // ---- lifecycle ----

    #[tokio::test]
    async fn add_zone_conf_is_idempotent() {
        let api = Arc::new(MockZoneApi::new());
        let svc = service(&api).await;

        assert!(svc.add_zone_conf("example.com").await.unwrap());
        assert!(!svc.add_zone_conf("example.com.").await.unwrap());
        assert_eq!(api.zone_count(), 1);
    }

    #[tokio::test]
    async fn remove_zones_deletes_remote_and_cached() {
        let api = Arc::new(MockZoneApi::new());
        api.seed_zone("a.com");
        api.seed_zone("b.com");
        api.seed_zone("c.com");
        let svc = service(&api).await;

        assert_eq!(svc.remove_zones("a.com, b.com").await.unwrap(), 2);
        assert_eq!(svc.get_zone_list().await, vec!["c.com"]);
        assert_eq!(api.zone_count(), 1);

        let err = svc.remove_zone("a.com").await.unwrap_err();
        assert!(matches!(err, CoreError::ZoneNotFound(_)));
    }

    // ---- queries ----

    #[tokio::test]
    async fn queries_read_from_cache() {
        let api = Arc::new(MockZoneApi::new());
        let id = api.seed_zone("a.com");
        api.seed_records(&id, a_records(2));
        api.seed_zone("b.com");
        let svc = service(&api).await;
        api.clear_calls();

        assert!(svc.zone_exists("A.com").await.unwrap());
        assert!(!svc.zone_exists("z.com").await.unwrap());
        assert_eq!(svc.get_nameservers().await, vec!["ns1.mock.net", "ns2.mock.net"]);

        let rendered = svc.get_zone("a.com").await.unwrap();
        assert!(rendered.contains("$ORIGIN a.com."));
        assert!(rendered.contains("host1 300 IN A 192.0.2.1"));

        let both = svc.get_zones("a.com,b.com").await.unwrap();
        assert!(both.contains("$ORIGIN b.com."));
        assert_eq!(both, svc.get_all_zones().await);

        assert!(matches!(
            svc.get_zones("a.com,missing.com").await,
            Err(CoreError::ZoneNotFound(_))
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn refresh_picks_up_remote_changes() {
        let api = Arc::new(MockZoneApi::new());
        let svc = service(&api).await;
        api.seed_zone("late.com");

        assert!(!svc.zone_exists("late.com").await.unwrap());
        assert_eq!(svc.refresh().await.unwrap(), 1);
        assert!(svc.zone_exists("late.com").await.unwrap());
    }

    #[tokio::test]
    async fn refresh_excludes_concurrent_saves() {
        let api = Arc::new(MockZoneApi::new());
        let svc = Arc::new(service(&api).await);

        api.pause_next_zone_listing();
        let refresh = tokio::spawn({
            let svc = svc.clone();
            async move { svc.refresh().await }
        });
        api.wait_for_zone_listing().await;

        // The refresh holds an empty snapshot; the save must not slip in before it lands
        let save = tokio::spawn({
            let svc = svc.clone();
            async move { svc.save_zone("example.com", ZONE).await }
        });
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!save.is_finished());
        assert_eq!(api.zone_count(), 0);

        api.resume_zone_listing();
        assert_eq!(refresh.await.unwrap().unwrap(), 0);
        assert!(save.await.unwrap().unwrap().zone_created);

        assert!(svc.zone_exists("example.com").await.unwrap());
        let again = svc.save_zone("example.com", ZONE).await.unwrap();
        assert!(!again.zone_created);
        assert_eq!(api.zone_count(), 1);
    }

    #[tokio::test]
    async fn idle_zone_locks_are_pruned() {
        let api = Arc::new(MockZoneApi::new());
        let svc = service(&api).await;

        for zone in ["a.com", "b.com", "c.com"] {
            svc.add_zone_conf(zone).await.unwrap();
        }
        assert_eq!(svc.zone_locks.lock().await.len(), 1);

        let held = svc.zone_lock("d.com").await;
        svc.add_zone_conf("e.com").await.unwrap();
        let mut domains: Vec<String> = svc.zone_locks.lock().await.keys().cloned().collect();
        domains.sort();
        assert_eq!(domains, vec!["d.com", "e.com"]);
        drop(held);
    }

    #[tokio::test]
    async fn sync_zones_stops_at_first_failure() {
        let api = Arc::new(MockZoneApi::new());
        let svc = service(&api).await;

        let zones = vec![
            ("a.com".to_string(), "$TTL 60\n@ A 192.0.2.1\n".to_string()),
            ("b.com".to_string(), "$TTL 60\n@ A bad\n".to_string()),
            ("c.com".to_string(), "$TTL 60\n@ A 192.0.2.3\n".to_string()),
        ];
        let err = svc.sync_zones(&zones).await.unwrap_err();
        assert!(matches!(err, CoreError::ZoneFileParse { .. }));
        assert!(svc.zone_exists("a.com").await.unwrap());
        assert!(!svc.zone_exists("c.com").await.unwrap());
    }

    // ---- execute ----

    #[tokio::test]
    async fn execute_maps_results() {
        let api = Arc::new(MockZoneApi::new());
        api.seed_zone("a.com");
        let svc = service(&api).await;

        let exists = svc
            .execute(ZoneCommand::ZoneExists {
                zone: "a.com".to_string(),
            })
            .await;
        assert_eq!(exists, OperationResult::success("1"));

        let missing = svc
            .execute(ZoneCommand::GetZone {
                zone: "nope.com".to_string(),
            })
            .await;
        assert_eq!(missing.status, StatusCode::Failure);
        assert_eq!(missing.message, "Zone not found: nope.com");

        let list = svc.execute(ZoneCommand::GetZoneList).await;
        assert_eq!(list.message, "a.com");

        let refreshed = svc.execute(ZoneCommand::Refresh).await;
        assert_eq!(refreshed.message, "Cache refreshed: 1 zone(s)");
    }

    #[tokio::test]
    async fn bootstrap_rejects_bad_settings() {
        let api: Arc<dyn ZoneApi> = Arc::new(MockZoneApi::new());
        let result = ZoneSyncService::bootstrap(
            api,
            Arc::new(BasicZoneParser::new()),
            SyncSettings {
                page_size: 0,
                bulk_limit: 1000,
            },
        )
        .await;
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
    }
}
