//! Log sanitization utilities
//!
//! Keeps client secrets, bearer tokens and large zone payloads (long TXT
//! records, DKIM keys) out of debug/error logs.

/// Maximum number of bytes of a response body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters of a secret that stay visible.
const SECRET_VISIBLE_PREFIX: usize = 4;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Strings within the limit are returned unchanged; longer ones keep the
/// first `TRUNCATE_LIMIT` bytes and note the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a secret, leaving only a short prefix for identification.
pub fn mask_secret(s: &str) -> String {
    let visible: String = s.chars().take(SECRET_VISIBLE_PREFIX).collect();
    if visible.len() == s.len() {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
