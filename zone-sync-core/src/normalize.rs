//! Record normalization
//!
//! Turns parsed [`LocalRecord`]s into the provider's flattened record shape
//! and decides whether a local record and a cached remote record are the
//! same record. Everything here is pure.

use std::net::IpAddr;

use crate::types::{LocalRecord, NewRecord, RecordData, RecordType, RemoteRecord};
use crate::utils::domain::{full_name_to_relative, relative_names_equal};

/// Longest character-string a TXT segment may carry.
pub const TXT_SEGMENT_LIMIT: usize = 255;

/// Zone-relative name of a local record (`"@"` for the apex).
pub fn relative_name(name: &str, zone: &str) -> String {
    full_name_to_relative(name, zone)
}

/// Ensure exactly one trailing dot.
fn with_trailing_dot(value: &str) -> String {
    format!("{}.", value.trim_end_matches('.'))
}

/// Canonical text form of an address, or the input if it does not parse.
fn canonical_address(address: &str) -> String {
    address
        .trim()
        .parse::<IpAddr>()
        .map_or_else(|_| address.trim().to_string(), |ip| ip.to_string())
}

/// Flattened provider data for a record, `None` for unsupported types.
pub fn encode_data(data: &RecordData) -> Option<String> {
    let record_type = data.record_type()?;
    let base = match data {
        RecordData::A { address } | RecordData::Aaaa { address } => canonical_address(address),
        RecordData::Cname { target } => target.clone(),
        RecordData::Ns { host } => host.clone(),
        RecordData::Mx {
            preference,
            exchange,
        } => format!("{preference} {exchange}"),
        RecordData::Srv {
            priority,
            weight,
            port,
            target,
        } => format!("{priority} {weight} {port} {}", with_trailing_dot(target)),
        RecordData::Txt { text } => encode_txt(text),
        RecordData::Other { .. } => return None,
    };

    if record_type.needs_trailing_dot() {
        Some(with_trailing_dot(&base))
    } else {
        Some(base)
    }
}

/// Split TXT text into segments the provider accepts.
///
/// Text of at most [`TXT_SEGMENT_LIMIT`] bytes passes through verbatim.
/// Longer text is cut on character boundaries and each piece is quoted,
/// with `"` and `\` escaped, joined by single spaces.
pub fn encode_txt(text: &str) -> String {
    if text.len() <= TXT_SEGMENT_LIMIT {
        return text.to_string();
    }

    let mut segments = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let mut cut = rest.len().min(TXT_SEGMENT_LIMIT);
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        let (head, tail) = rest.split_at(cut);
        segments.push(quote_txt(head));
        rest = tail;
    }
    segments.join(" ")
}

/// Wrap a TXT segment in quotes, escaping `"` and `\`.
pub fn quote_txt(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 2);
    out.push('"');
    for c in segment.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Recover the raw text from TXT data in either encoded form.
///
/// Data that does not start with a quote is taken verbatim; otherwise the
/// quoted segments are unescaped and concatenated.
pub fn decode_txt(data: &str) -> String {
    let trimmed = data.trim();
    if !trimmed.starts_with('"') {
        return data.to_string();
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut in_quotes = false;
    let mut chars = trimmed.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\\' if in_quotes => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            _ if in_quotes => out.push(c),
            _ => {}
        }
    }
    out
}

/// Provider shape for a local record, `None` if its type is not synchronized.
pub fn to_remote_shape(record: &LocalRecord, zone: &str) -> Option<NewRecord> {
    let record_type = record.record_type()?;
    Some(NewRecord {
        name: relative_name(&record.name, zone),
        record_type: record_type.as_str().to_string(),
        ttl: record.ttl,
        data: encode_data(&record.data)?,
        weight: None,
    })
}

/// Compare provider data of the given type.
///
/// Host names compare case-insensitively; addresses compare canonically;
/// TXT compares the decoded text so quoting differences do not matter.
fn data_equal(record_type: RecordType, local: &str, remote: &str) -> bool {
    match record_type {
        RecordType::A | RecordType::Aaaa => canonical_address(local) == canonical_address(remote),
        RecordType::Cname | RecordType::Mx | RecordType::Ns | RecordType::Srv => {
            with_trailing_dot(local.trim()).eq_ignore_ascii_case(&with_trailing_dot(remote.trim()))
        }
        RecordType::Txt => decode_txt(local) == decode_txt(remote),
    }
}

/// Whether a local record and a cached remote record are the same record.
///
/// Checks TTL, type, relative name and encoded data, stopping at the first
/// mismatch. Remote ids never take part.
pub fn records_match(local: &LocalRecord, remote: &RemoteRecord, zone: &str) -> bool {
    if local.ttl != remote.ttl {
        return false;
    }
    let Some(record_type) = local.record_type() else {
        return false;
    };
    if !record_type.as_str().eq_ignore_ascii_case(remote.record_type.trim()) {
        return false;
    }
    if !relative_names_equal(&relative_name(&local.name, zone), &remote.name) {
        return false;
    }
    encode_data(&local.data).is_some_and(|data| data_equal(record_type, &data, &remote.data))
}
