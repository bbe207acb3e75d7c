//! In-process cache of remote zones and their records
//!
//! The cache is the only read path the engine uses to answer "does this zone
//! or record exist". It is built once from a full paginated fetch and then
//! patched in place after every mutation.

use std::collections::HashSet;

use zone_sync_provider::{Result as ProviderResult, ZoneApi};

use crate::error::{CoreError, CoreResult};
use crate::types::{RemoteRecord, RemoteZone};
use crate::utils::domain::{domains_equal, normalize_domain};

/// Every remote zone of a stack, each with its full record list.
#[derive(Debug, Clone, Default)]
pub struct RemoteCache {
    zones: Vec<RemoteZone>,
}

impl RemoteCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache over already-fetched zones.
    pub fn from_zones(zones: Vec<RemoteZone>) -> Self {
        Self { zones }
    }

    /// Fetch every zone, then every record of each zone.
    ///
    /// Any failed page aborts the whole load; no partial cache is returned.
    pub async fn load(api: &dyn ZoneApi, page_size: u32) -> ProviderResult<Self> {
        let mut zones = api.list_all_zones(page_size).await?;
        for zone in &mut zones {
            zone.records = api.list_all_records(&zone.id, page_size).await?;
            log::debug!("Cached {} records for zone {}", zone.records.len(), zone.domain);
        }
        log::info!("Loaded {} zones into the remote cache", zones.len());
        Ok(Self { zones })
    }

    pub fn list_zones(&self) -> &[RemoteZone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// All zones whose domain matches, ignoring case and a trailing dot.
    pub fn find_zones_by_domain(&self, domain: &str) -> Vec<&RemoteZone> {
        self.zones
            .iter()
            .filter(|z| domains_equal(&z.domain, domain))
            .collect()
    }

    /// The single zone for `domain`.
    ///
    /// # Errors
    ///
    /// [`CoreError::AmbiguousZone`] when more than one zone matches.
    pub fn find_zone(&self, domain: &str) -> CoreResult<Option<&RemoteZone>> {
        let mut matches = self.find_zones_by_domain(domain);
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            count => Err(CoreError::AmbiguousZone {
                domain: normalize_domain(domain),
                count,
            }),
        }
    }

    /// Look a zone up by provider id.
    pub fn get(&self, zone_id: &str) -> Option<&RemoteZone> {
        self.zones.iter().find(|z| z.id == zone_id)
    }

    /// Insert a zone, replacing any cached zone with the same id.
    pub fn add_zone(&mut self, zone: RemoteZone) {
        if let Some(existing) = self.zones.iter_mut().find(|z| z.id == zone.id) {
            *existing = zone;
        } else {
            self.zones.push(zone);
        }
    }

    /// Drop a zone by id, returning it if it was cached.
    pub fn remove_zone(&mut self, zone_id: &str) -> Option<RemoteZone> {
        let idx = self.zones.iter().position(|z| z.id == zone_id)?;
        Some(self.zones.remove(idx))
    }

    /// Overwrite a zone's record list. Returns `false` if the zone is not cached.
    pub fn replace_records(&mut self, zone_id: &str, records: Vec<RemoteRecord>) -> bool {
        match self.zones.iter_mut().find(|z| z.id == zone_id) {
            Some(zone) => {
                zone.records = records;
                true
            }
            None => false,
        }
    }

    /// Union of all zones' nameservers, deduplicated in first-seen order.
    pub fn list_nameservers(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.zones
            .iter()
            .flat_map(|z| z.nameservers.iter())
            .filter(|ns| seen.insert(normalize_domain(ns)))
            .cloned()
            .collect()
    }
}
