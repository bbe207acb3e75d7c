//! Zone-file rendering from the remote cache

use std::fmt::Write as _;

use crate::normalize::quote_txt;
use crate::types::{RecordType, RemoteRecord, RemoteZone};
use crate::utils::domain::domains_equal;

const SOA_TTL: u32 = 3600;
const SOA_REFRESH: u32 = 3600;
const SOA_RETRY: u32 = 600;
const SOA_EXPIRE: u32 = 604_800;
const SOA_MINIMUM: u32 = 3600;
const NS_TTL: u32 = 86_400;

/// Render a cached zone as master-file text.
///
/// Output order: metadata comments, `$ORIGIN`, a synthesized SOA, one NS
/// line per provider nameserver, then every cached record. Remote NS
/// records that repeat a provider nameserver are not printed twice.
pub fn render_zone(zone: &RemoteZone) -> String {
    let domain = zone.domain.trim_end_matches('.');
    let mut out = String::new();

    let _ = writeln!(out, "; Zone: {domain}");
    let _ = writeln!(out, "; Zone ID: {}", zone.id);
    for (label, value) in [
        ("Stack", &zone.stack_id),
        ("Status", &zone.status),
        ("Version", &zone.version),
        ("Updated", &zone.updated),
    ] {
        if let Some(value) = value {
            let _ = writeln!(out, "; {label}: {value}");
        }
    }

    let _ = writeln!(out, "$ORIGIN {domain}.");

    let mname = zone
        .nameservers
        .first()
        .map_or_else(|| format!("ns1.{domain}."), |ns| absolute(ns));
    let serial = zone
        .version
        .as_deref()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(1);
    let _ = writeln!(
        out,
        "@ {SOA_TTL} IN SOA {mname} hostmaster.{domain}. {serial} {SOA_REFRESH} {SOA_RETRY} {SOA_EXPIRE} {SOA_MINIMUM}"
    );

    for ns in &zone.nameservers {
        let _ = writeln!(out, "@ {NS_TTL} IN NS {}", absolute(ns));
    }

    for record in &zone.records {
        if is_provider_ns(zone, record) {
            continue;
        }
        let name = if record.name.is_empty() { "@" } else { &record.name };
        let _ = writeln!(
            out,
            "{name} {} IN {} {}",
            record.ttl,
            record.record_type.to_ascii_uppercase(),
            render_data(record)
        );
    }

    out
}

fn absolute(host: &str) -> String {
    format!("{}.", host.trim_end_matches('.'))
}

fn is_provider_ns(zone: &RemoteZone, record: &RemoteRecord) -> bool {
    RecordType::parse(&record.record_type) == Some(RecordType::Ns)
        && zone.nameservers.iter().any(|ns| domains_equal(ns, &record.data))
}

fn render_data(record: &RemoteRecord) -> String {
    match RecordType::parse(&record.record_type) {
        Some(RecordType::Txt) if !record.data.trim_start().starts_with('"') => {
            quote_txt(&record.data)
        }
        _ => record.data.clone(),
    }
}
