use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============ Pagination ============

/// Cursor value that asks the API for the first page.
pub const FIRST_PAGE_CURSOR: &str = "-1";

/// Cursor pagination parameters sent as `page_request.first` / `page_request.after`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of items in the page.
    pub first: u32,
    /// Opaque cursor of the last item already seen.
    pub after: String,
}

impl PageRequest {
    /// Request for the first page.
    pub fn first_page(page_size: u32) -> Self {
        Self {
            first: page_size,
            after: FIRST_PAGE_CURSOR.to_string(),
        }
    }

    /// Encode as a query string (without the leading `?`).
    pub fn to_query(&self) -> String {
        format!(
            "page_request.first={}&page_request.after={}",
            self.first,
            urlencoding::encode(&self.after)
        )
    }
}

/// Page metadata returned alongside every listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    /// Total item count; the API reports it as a string.
    #[serde(deserialize_with = "crate::utils::lenient::string_or_number")]
    pub total_count: Option<String>,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items in this page, in arrival order.
    pub items: Vec<T>,
    /// Cursor metadata for the next request.
    pub page_info: PageInfo,
}

/// `GET /stacks/{stack}/zones` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonesPage {
    #[serde(default)]
    pub zones: Vec<RemoteZone>,
    #[serde(default)]
    pub page_info: PageInfo,
}

impl From<ZonesPage> for Page<RemoteZone> {
    fn from(page: ZonesPage) -> Self {
        Self {
            items: page.zones,
            page_info: page.page_info,
        }
    }
}

/// `GET /stacks/{stack}/zones/{zone}/records` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsPage {
    #[serde(default)]
    pub records: Vec<RemoteRecord>,
    #[serde(default)]
    pub page_info: PageInfo,
}

impl From<RecordsPage> for Page<RemoteRecord> {
    fn from(page: RecordsPage) -> Self {
        Self {
            items: page.records,
            page_info: page.page_info,
        }
    }
}

/// `POST /stacks/{stack}/zones` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneEnvelope {
    pub zone: RemoteZone,
}

// ============ Zones & Records ============

/// A zone as reported by the provider.
///
/// `records` is never part of the wire shape; the engine fills it from a
/// separate paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteZone {
    /// Provider-assigned zone identifier.
    pub id: String,
    pub stack_id: Option<String>,
    pub account_id: Option<String>,
    /// Domain name without trailing dot.
    pub domain: String,
    /// Serial-like version counter, opaque to us.
    #[serde(deserialize_with = "crate::utils::lenient::string_or_number")]
    pub version: Option<String>,
    pub labels: Option<HashMap<String, String>>,
    pub created: Option<String>,
    pub updated: Option<String>,
    /// Nameserver hostnames assigned to the zone.
    pub nameservers: Vec<String>,
    pub verified: Option<String>,
    pub status: Option<String>,
    pub disabled: Option<bool>,
    #[serde(skip)]
    pub records: Vec<RemoteRecord>,
}

/// A DNS record as stored by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteRecord {
    /// Provider-assigned record identifier, required for deletion.
    pub id: String,
    /// Zone-relative name; the apex is the empty string or `@`.
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub class_type: Option<String>,
    pub ttl: u32,
    /// Flattened record data (for example `"10 mail.example.com."` for MX).
    pub data: String,
    pub weight: Option<u32>,
    pub labels: Option<HashMap<String, String>>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

/// A record to be created through the bulk endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    /// Zone-relative name.
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

// ============ Transport ============

/// Outcome of a single HTTP call.
///
/// `body` is present only when the response declared a JSON content type and
/// carried a non-empty body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// `true` for any 2xx status.
    pub succeeded: bool,
    pub status: u16,
    pub raw_body: String,
    pub body: Option<Value>,
}

/// Client-credentials token request body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub grant_type: &'static str,
}

/// Identity endpoint response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TokenResponse {
    pub token_type: Option<String>,
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
}
