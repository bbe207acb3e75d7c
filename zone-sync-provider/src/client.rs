//! StackPath DNS API client
//!
//! Authenticates once at construction (OAuth2 client credentials) and attaches
//! the bearer token to every later call. There is no token refresh: an expired
//! token surfaces as an [`ProviderError::ApiError`] with status 401.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::ZoneApi;
use crate::types::{
    ApiResponse, NewRecord, Page, PageRequest, RecordsPage, RemoteRecord, RemoteZone,
    TokenRequest, TokenResponse, ZoneEnvelope, ZonesPage,
};
use crate::utils::log_sanitizer::{mask_secret, truncate_for_log};

/// Default DNS API base URL.
pub const DEFAULT_BASE_URL: &str = "https://gateway.stackpath.com/dns/v1";
/// Default OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://gateway.stackpath.com/identity/v1/oauth2/token";

/// Default connect timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`StackpathClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Stack that owns the zones.
    pub stack_id: String,
    pub base_url: String,
    pub token_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &mask_secret(&self.client_secret))
            .field("stack_id", &self.stack_id)
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Config with default endpoints and timeouts.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        stack_id: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            stack_id: stack_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    fn validate(&self) -> Result<()> {
        for (param, value) in [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("stack_id", &self.stack_id),
        ] {
            if value.trim().is_empty() {
                return Err(ProviderError::InvalidParameter {
                    param: param.to_string(),
                    detail: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Authenticated DNS API client.
pub struct StackpathClient {
    client: Client,
    base_url: String,
    stack_id: String,
    access_token: String,
}

impl std::fmt::Debug for StackpathClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackpathClient")
            .field("base_url", &self.base_url)
            .field("stack_id", &self.stack_id)
            .finish_non_exhaustive()
    }
}

impl StackpathClient {
    /// Build the HTTP client and exchange the client credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// [`ProviderError::AuthenticationFailed`] if the identity endpoint rejects
    /// the credentials or answers without a bearer token.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ProviderError::NetworkError {
                detail: format!("Failed to create HTTP client: {e}"),
            })?;

        let access_token = Self::exchange_token(&client, &config).await?;
        log::info!("Authenticated against {}", config.token_url);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            stack_id: config.stack_id,
            access_token,
        })
    }

    async fn exchange_token(client: &Client, config: &ClientConfig) -> Result<String> {
        let body = TokenRequest {
            client_id: &config.client_id,
            client_secret: &config.client_secret,
            grant_type: "client_credentials",
        };
        let builder = client.post(&config.token_url).json(&body);
        let response = HttpUtils::execute_request(builder, "POST", &config.token_url).await?;

        if !response.succeeded {
            let message = response.error_message();
            log::warn!("Token exchange rejected (HTTP {}): {message}", response.status);
            return Err(ProviderError::AuthenticationFailed {
                raw_message: Some(message),
            });
        }

        let token: TokenResponse = HttpUtils::decode_body(response).map_err(|e| {
            ProviderError::AuthenticationFailed {
                raw_message: Some(e.to_string()),
            }
        })?;

        let is_bearer = token
            .token_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("bearer"));
        match token.access_token {
            Some(access_token) if is_bearer && !access_token.is_empty() => {
                if let Some(secs) = token.expires_in {
                    log::debug!("Bearer token expires in {secs}s");
                }
                Ok(access_token)
            }
            _ => Err(ProviderError::AuthenticationFailed {
                raw_message: Some("no bearer token in identity response".to_string()),
            }),
        }
    }

    /// Stack this client operates on.
    pub fn stack_id(&self) -> &str {
        &self.stack_id
    }

    /// Issue an authenticated request against a path below the stack's base URL.
    ///
    /// Non-2xx statuses are *not* errors here; inspect [`ApiResponse::succeeded`]
    /// or call [`ApiResponse::into_result`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{path}", self.base_url);
        let mut builder = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.access_token);
        if let Some(body) = body {
            log::debug!("Request Body: {}", truncate_for_log(&body.to_string()));
            builder = builder.json(body);
        }
        HttpUtils::execute_request(builder, method.as_str(), &url).await
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse> {
        let value = serde_json::to_value(body).map_err(|e| ProviderError::InvalidParameter {
            param: "body".to_string(),
            detail: e.to_string(),
        })?;
        self.request(method, path, Some(&value)).await?.into_result()
    }

    fn zones_path(&self) -> String {
        format!("/stacks/{}/zones", urlencoding::encode(&self.stack_id))
    }

    fn zone_path(&self, zone_id: &str) -> String {
        format!("{}/{}", self.zones_path(), urlencoding::encode(zone_id))
    }
}

#[async_trait]
impl ZoneApi for StackpathClient {
    async fn list_zones_page(&self, page: &PageRequest) -> Result<Page<RemoteZone>> {
        let path = format!("{}?{}", self.zones_path(), page.to_query());
        let response = self.request(Method::GET, &path, None).await?.into_result()?;
        let page: ZonesPage = HttpUtils::decode_body(response)?;
        Ok(page.into())
    }

    async fn list_records_page(
        &self,
        zone_id: &str,
        page: &PageRequest,
    ) -> Result<Page<RemoteRecord>> {
        let path = format!("{}/records?{}", self.zone_path(zone_id), page.to_query());
        let response = self.request(Method::GET, &path, None).await?.into_result()?;
        let page: RecordsPage = HttpUtils::decode_body(response)?;
        Ok(page.into())
    }

    async fn create_zone(&self, domain: &str) -> Result<RemoteZone> {
        let response = self
            .send_json(Method::POST, &self.zones_path(), &json!({ "domain": domain }))
            .await?;
        let envelope: ZoneEnvelope = HttpUtils::decode_body(response)?;
        log::info!("Created zone {} ({})", envelope.zone.domain, envelope.zone.id);
        Ok(envelope.zone)
    }

    async fn delete_zone(&self, zone_id: &str) -> Result<()> {
        self.request(Method::DELETE, &self.zone_path(zone_id), None)
            .await?
            .into_result()?;
        log::info!("Deleted zone {zone_id}");
        Ok(())
    }

    async fn bulk_create_records(&self, zone_id: &str, records: &[NewRecord]) -> Result<()> {
        #[derive(Serialize)]
        struct BulkCreateBody<'a> {
            records: &'a [NewRecord],
        }

        let path = format!("{}/bulk/records", self.zone_path(zone_id));
        self.send_json(Method::POST, &path, &BulkCreateBody { records })
            .await?;
        Ok(())
    }

    async fn bulk_delete_records(&self, zone_id: &str, record_ids: &[String]) -> Result<()> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct BulkDeleteBody<'a> {
            zone_record_ids: &'a [String],
        }

        let path = format!("{}/bulk/records/delete", self.zone_path(zone_id));
        self.send_json(Method::POST, &path, &BulkDeleteBody {
            zone_record_ids: record_ids,
        })
        .await?;
        Ok(())
    }
}
