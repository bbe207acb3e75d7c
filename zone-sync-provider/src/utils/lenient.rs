//! Lenient deserialization helpers
//!
//! Counters such as `version` and `totalCount` arrive as JSON strings from
//! most endpoints and as numbers from a few. Both are normalized to
//! `Option<String>` so callers can treat them as opaque values.

use serde::{Deserialize, Deserializer};

/// Deserialize a string, integer or null into `Option<String>`.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        I64(i64),
        U64(u64),
    }

    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::I64(n) => n.to_string(),
            StringOrNumber::U64(n) => n.to_string(),
        }),
    )
}
