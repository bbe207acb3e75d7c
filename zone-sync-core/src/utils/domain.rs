//! Domain name handling

/// Lowercase a domain and drop surrounding whitespace and trailing dots.
///
/// `"Example.COM."` -> `"example.com"`
pub fn normalize_domain(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Compare two domain names, ignoring case and trailing dots.
pub fn domains_equal(a: &str, b: &str) -> bool {
    a.trim()
        .trim_end_matches('.')
        .eq_ignore_ascii_case(b.trim().trim_end_matches('.'))
}

/// Split a comma-separated zone list, dropping blanks.
///
/// `"a.com, b.com,,"` -> `["a.com", "b.com"]`
pub fn split_zone_list(zones: &str) -> Vec<String> {
    zones
        .split(',')
        .map(str::trim)
        .filter(|z| !z.is_empty())
        .map(str::to_string)
        .collect()
}

/// Convert a fully qualified name to one relative to `zone`.
///
/// - `"www.example.com."` + `"example.com"` -> `"www"`
/// - `"example.com."` + `"example.com"` -> `"@"`
///
/// A name outside the zone is returned unchanged.
pub fn full_name_to_relative(full_name: &str, zone: &str) -> String {
    let name = full_name.strip_suffix('.').unwrap_or(full_name);
    let zone = zone.trim_end_matches('.');

    if name.eq_ignore_ascii_case(zone) {
        return "@".to_string();
    }
    let split = name.len().checked_sub(zone.len() + 1);
    match split {
        Some(idx)
            if name.is_char_boundary(idx)
                && name[idx..].starts_with('.')
                && name[idx + 1..].eq_ignore_ascii_case(zone) =>
        {
            name[..idx].to_string()
        }
        _ => full_name.to_string(),
    }
}

/// Convert a zone-relative name back to a fully qualified one (no trailing dot).
///
/// `"@"` and `""` both denote the apex.
pub fn relative_to_full_name(relative: &str, zone: &str) -> String {
    let zone = zone.trim_end_matches('.');
    if relative.is_empty() || relative == "@" {
        zone.to_string()
    } else {
        format!("{relative}.{zone}")
    }
}

/// Compare zone-relative names; `""` and `"@"` are the same apex.
pub fn relative_names_equal(a: &str, b: &str) -> bool {
    fn apex(name: &str) -> &str {
        if name.is_empty() { "@" } else { name }
    }
    apex(a).eq_ignore_ascii_case(apex(b))
}
