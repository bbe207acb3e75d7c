//! Zone reconciliation
//!
//! Computes the deletions and creations that make a cached remote zone
//! match a local record list. The local side is authoritative: remote-only
//! records of synchronized types are deleted.

use std::collections::HashSet;

use serde::Serialize;

use crate::normalize::{records_match, to_remote_shape};
use crate::types::{LocalRecord, NewRecord, RecordData, RecordType, RemoteRecord, RemoteZone};
use crate::utils::domain::{domains_equal, full_name_to_relative, relative_names_equal};

/// Record changes for one zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ZoneDiff {
    /// Remote record ids to delete.
    pub deletions: Vec<String>,
    /// Normalized records to create, without duplicates.
    pub additions: Vec<NewRecord>,
}

impl ZoneDiff {
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.additions.is_empty()
    }
}

/// Diff `local` against the records cached for `zone`.
pub fn diff_zone(zone: &RemoteZone, local: &[LocalRecord]) -> ZoneDiff {
    let domain = zone.domain.as_str();

    let deletions = zone
        .records
        .iter()
        .filter(|remote| is_managed(zone, remote))
        .filter(|remote| !local.iter().any(|l| records_match(l, remote, domain)))
        .map(|remote| remote.id.clone())
        .collect();

    let mut seen = HashSet::new();
    let additions = local
        .iter()
        .filter(|l| !is_zone_nameserver(zone, l))
        .filter(|l| !zone.records.iter().any(|remote| records_match(l, remote, domain)))
        .filter_map(|l| to_remote_shape(l, domain))
        .filter(|shape: &NewRecord| {
            seen.insert((
                shape.name.to_ascii_lowercase(),
                shape.record_type.clone(),
                shape.ttl,
                shape.data.clone(),
            ))
        })
        .collect();

    ZoneDiff {
        deletions,
        additions,
    }
}

/// Whether a remote record is under sync control.
///
/// Records of unsupported types are never deleted.
fn is_managed(zone: &RemoteZone, remote: &RemoteRecord) -> bool {
    match RecordType::parse(&remote.record_type) {
        None => false,
        // The provider owns the apex NS set it assigned to the zone
        Some(RecordType::Ns) => !(is_apex(zone, &remote.name)
            && zone
                .nameservers
                .iter()
                .any(|ns| domains_equal(ns, &remote.data))),
        Some(_) => true,
    }
}

fn is_apex(zone: &RemoteZone, name: &str) -> bool {
    relative_names_equal(&full_name_to_relative(name, &zone.domain), "@")
}

/// A local NS record pointing at one of the zone's assigned nameservers.
fn is_zone_nameserver(zone: &RemoteZone, local: &LocalRecord) -> bool {
    match &local.data {
        RecordData::Ns { host } => zone.nameservers.iter().any(|ns| domains_equal(ns, host)),
        _ => false,
    }
}
