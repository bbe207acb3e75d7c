//! Test helpers
//!
//! [`MockZoneApi`] is an in-memory provider with real cursor pagination that
//! records every call, plus small factories for zones and records.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;
use zone_sync_provider::{
    FIRST_PAGE_CURSOR, NewRecord, Page, PageInfo, PageRequest, ProviderError, RemoteRecord,
    RemoteZone, Result, ZoneApi,
};

/// Nameservers assigned to every mock zone.
pub const MOCK_NAMESERVERS: [&str; 2] = ["ns1.mock.net", "ns2.mock.net"];

// ===== Factories =====

pub fn zone(id: &str, domain: &str) -> RemoteZone {
    RemoteZone {
        id: id.to_string(),
        domain: domain.to_string(),
        ..Default::default()
    }
}

pub fn record(id: &str, name: &str, record_type: &str, ttl: u32, data: &str) -> RemoteRecord {
    RemoteRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type: record_type.to_string(),
        ttl,
        data: data.to_string(),
        ..Default::default()
    }
}

/// `count` distinct A records without ids.
pub fn a_records(count: usize) -> Vec<RemoteRecord> {
    (0..count)
        .map(|i| record("", &format!("host{i}"), "A", 300, "192.0.2.1"))
        .collect()
}

// ===== MockZoneApi =====

/// A call received by [`MockZoneApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListZones { after: String },
    ListRecords { zone_id: String, after: String },
    CreateZone { domain: String },
    DeleteZone { zone_id: String },
    BulkCreate { zone_id: String, count: usize },
    BulkDelete { zone_id: String, count: usize },
}

#[derive(Default)]
struct MockState {
    zones: Vec<RemoteZone>,
    next_zone: usize,
    next_record: usize,
    calls: Vec<ApiCall>,
    bulk_calls: usize,
    fail_bulk_call: Option<usize>,
    failing_listings: HashSet<String>,
    fail_create_zone: bool,
}

impl MockState {
    fn record_id(&mut self) -> String {
        self.next_record += 1;
        format!("rec-{}", self.next_record)
    }

    fn zone_mut(&mut self, zone_id: &str) -> Result<&mut RemoteZone> {
        self.zones
            .iter_mut()
            .find(|z| z.id == zone_id)
            .ok_or_else(|| not_found(zone_id))
    }

    /// Count a bulk call and fail it if it is the configured one.
    fn bulk_call(&mut self) -> Result<()> {
        self.bulk_calls += 1;
        if self.fail_bulk_call == Some(self.bulk_calls) {
            return Err(ProviderError::ApiError {
                status: 500,
                message: "mock bulk failure".to_string(),
            });
        }
        Ok(())
    }
}

fn not_found(zone_id: &str) -> ProviderError {
    ProviderError::ApiError {
        status: 404,
        message: format!("zone {zone_id} not found"),
    }
}

/// Cursor = index of the last item returned, as the live API does.
fn paginate<T: Clone>(items: &[T], req: &PageRequest, cap: Option<u32>) -> Page<T> {
    let start = if req.after == FIRST_PAGE_CURSOR {
        0
    } else {
        req.after.parse::<usize>().map_or(items.len(), |i| i + 1)
    };
    let size = cap.map_or(req.first, |c| c.min(req.first)) as usize;
    let start = start.min(items.len());
    let end = (start + size).min(items.len());
    Page {
        items: items[start..end].to_vec(),
        page_info: PageInfo {
            total_count: Some(items.len().to_string()),
            has_previous_page: start > 0,
            has_next_page: end < items.len(),
            start_cursor: Some(start.to_string()),
            end_cursor: (end > start).then(|| (end - 1).to_string()),
        },
    }
}

/// Holds one zone listing open after its snapshot is taken.
#[derive(Default)]
struct ListingPause {
    armed: AtomicBool,
    reached: Notify,
    release: Notify,
}

/// In-memory [`ZoneApi`].
#[derive(Default)]
pub struct MockZoneApi {
    state: Mutex<MockState>,
    page_size_cap: Option<u32>,
    listing_pause: ListingPause,
}

impl MockZoneApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve pages no larger than `cap`, whatever the request asks for.
    pub fn with_page_size_cap(mut self, cap: u32) -> Self {
        self.page_size_cap = Some(cap);
        self
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Add a zone directly, bypassing call recording. Returns its id.
    pub fn seed_zone(&self, domain: &str) -> String {
        let mut state = self.state();
        state.next_zone += 1;
        let mut z = zone(&format!("zone-{}", state.next_zone), domain);
        z.nameservers = MOCK_NAMESERVERS.iter().map(ToString::to_string).collect();
        z.version = Some("1".to_string());
        let id = z.id.clone();
        state.zones.push(z);
        id
    }

    /// Append records to a zone; blank ids are assigned.
    pub fn seed_records(&self, zone_id: &str, records: Vec<RemoteRecord>) {
        let mut state = self.state();
        for mut r in records {
            if r.id.is_empty() {
                r.id = state.record_id();
            }
            state.zone_mut(zone_id).unwrap().records.push(r);
        }
    }

    /// Fail the `n`th bulk call (1-based, creates and deletes counted together).
    pub fn fail_bulk_call(&self, n: usize) {
        self.state().fail_bulk_call = Some(n);
    }

    /// Make record listing of `zone_id` fail.
    pub fn fail_record_listing(&self, zone_id: &str) {
        self.state().failing_listings.insert(zone_id.to_string());
    }

    /// Make the next zone listing page wait for [`Self::resume_zone_listing`].
    pub fn pause_next_zone_listing(&self) {
        self.listing_pause.armed.store(true, Ordering::SeqCst);
    }

    /// Wait until a paused zone listing has taken its snapshot.
    pub async fn wait_for_zone_listing(&self) {
        self.listing_pause.reached.notified().await;
    }

    pub fn resume_zone_listing(&self) {
        self.listing_pause.release.notify_one();
    }

    pub fn fail_create_zone(&self) {
        self.state().fail_create_zone = true;
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Current remote records of a zone.
    pub fn records(&self, zone_id: &str) -> Vec<RemoteRecord> {
        self.state()
            .zones
            .iter()
            .find(|z| z.id == zone_id)
            .map(|z| z.records.clone())
            .unwrap_or_default()
    }

    pub fn zone_count(&self) -> usize {
        self.state().zones.len()
    }
}

#[async_trait]
impl ZoneApi for MockZoneApi {
    async fn list_zones_page(&self, page: &PageRequest) -> Result<Page<RemoteZone>> {
        let result = {
            let mut state = self.state();
            state.calls.push(ApiCall::ListZones {
                after: page.after.clone(),
            });
            // Records are never part of the zone listing
            let zones: Vec<RemoteZone> = state
                .zones
                .iter()
                .map(|z| RemoteZone {
                    records: Vec::new(),
                    ..z.clone()
                })
                .collect();
            paginate(&zones, page, self.page_size_cap)
        };
        if self.listing_pause.armed.swap(false, Ordering::SeqCst) {
            self.listing_pause.reached.notify_one();
            self.listing_pause.release.notified().await;
        }
        Ok(result)
    }

    async fn list_records_page(
        &self,
        zone_id: &str,
        page: &PageRequest,
    ) -> Result<Page<RemoteRecord>> {
        let mut state = self.state();
        state.calls.push(ApiCall::ListRecords {
            zone_id: zone_id.to_string(),
            after: page.after.clone(),
        });
        if state.failing_listings.contains(zone_id) {
            return Err(ProviderError::ApiError {
                status: 503,
                message: "mock listing failure".to_string(),
            });
        }
        let records = state.zone_mut(zone_id)?.records.clone();
        Ok(paginate(&records, page, self.page_size_cap))
    }

    async fn create_zone(&self, domain: &str) -> Result<RemoteZone> {
        self.state().calls.push(ApiCall::CreateZone {
            domain: domain.to_string(),
        });
        if self.state().fail_create_zone {
            return Err(ProviderError::ApiError {
                status: 400,
                message: "mock zone creation failure".to_string(),
            });
        }
        let id = self.seed_zone(domain);
        let state = self.state();
        state
            .zones
            .iter()
            .find(|z| z.id == id)
            .cloned()
            .ok_or_else(|| not_found(&id))
    }

    async fn delete_zone(&self, zone_id: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(ApiCall::DeleteZone {
            zone_id: zone_id.to_string(),
        });
        let idx = state
            .zones
            .iter()
            .position(|z| z.id == zone_id)
            .ok_or_else(|| not_found(zone_id))?;
        state.zones.remove(idx);
        Ok(())
    }

    async fn bulk_create_records(&self, zone_id: &str, records: &[NewRecord]) -> Result<()> {
        let mut state = self.state();
        state.calls.push(ApiCall::BulkCreate {
            zone_id: zone_id.to_string(),
            count: records.len(),
        });
        state.bulk_call()?;
        let created: Vec<RemoteRecord> = records
            .iter()
            .map(|r| {
                let mut remote = record(&state.record_id(), &r.name, &r.record_type, r.ttl, &r.data);
                remote.weight = r.weight;
                remote
            })
            .collect();
        state.zone_mut(zone_id)?.records.extend(created);
        Ok(())
    }

    async fn bulk_delete_records(&self, zone_id: &str, record_ids: &[String]) -> Result<()> {
        let mut state = self.state();
        state.calls.push(ApiCall::BulkDelete {
            zone_id: zone_id.to_string(),
            count: record_ids.len(),
        });
        state.bulk_call()?;
        state
            .zone_mut(zone_id)?
            .records
            .retain(|r| !record_ids.contains(&r.id));
        Ok(())
    }
}
