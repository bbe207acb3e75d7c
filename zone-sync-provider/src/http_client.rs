//! Generic HTTP client tools
//!
//! Sends a prepared `RequestBuilder`, classifies the outcome and decodes
//! JSON bodies into an [`ApiResponse`]. Typed decoding into the wire shapes
//! happens one step later through [`HttpUtils::parse_json`], so the engine
//! never sees untyped maps.
//!
//! # design principles
//! - **No retries, no backoff** - every failure is returned to the caller
//! - **Decode only what is declared as JSON** - other bodies stay raw
//! - **A JSON body that cannot be decoded is fatal** for that call

use reqwest::RequestBuilder;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::types::ApiResponse;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the classified response
    ///
    /// # Arguments
    /// * `request_builder` - configured request constructor (including URL, headers, body, etc.)
    /// * `method_name` - request method name (such as "GET", "POST", used for logs)
    /// * `url` - request URL (for logging)
    ///
    /// # Returns
    /// * `Ok(ApiResponse)` - whatever the status code, as long as the exchange completed
    /// * `Err(ProviderError::NetworkError | Timeout)` - the exchange did not complete
    /// * `Err(ProviderError::ParseError)` - a JSON-typed body could not be decoded
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        url: &str,
    ) -> Result<ApiResponse> {
        log::debug!("{method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        log::debug!("Response Status: {status}");

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_json_content_type);

        let raw_body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!("Response Body: {}", truncate_for_log(&raw_body));

        let body = if is_json && !raw_body.trim().is_empty() {
            Some(Self::parse_json::<Value>(&raw_body)?)
        } else {
            None
        };

        Ok(ApiResponse {
            succeeded: status.is_success(),
            status: status.as_u16(),
            raw_body,
            body,
        })
    }

    /// Parse JSON response
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(ProviderError::ParseError)` - parsing failed
    pub fn parse_json<T>(response_text: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("JSON parse failed: {e}");
            log::error!("Raw response: {}", truncate_for_log(response_text));
            ProviderError::ParseError {
                detail: e.to_string(),
            }
        })
    }

    /// Decode an already-parsed JSON body into a typed shape
    pub fn decode_body<T>(response: ApiResponse) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let Some(body) = response.body else {
            return Err(ProviderError::ParseError {
                detail: format!(
                    "expected a JSON body (HTTP {}), got: {}",
                    response.status,
                    truncate_for_log(&response.raw_body)
                ),
            });
        };
        serde_json::from_value(body).map_err(|e| {
            log::error!("JSON decode failed: {e}");
            ProviderError::ParseError {
                detail: e.to_string(),
            }
        })
    }
}

impl ApiResponse {
    /// Turn a non-2xx response into [`ProviderError::ApiError`].
    pub fn into_result(self) -> Result<Self> {
        if self.succeeded {
            Ok(self)
        } else {
            let message = self.error_message();
            log::debug!("API error (HTTP {}): {message}", self.status);
            Err(ProviderError::ApiError {
                status: self.status,
                message,
            })
        }
    }

    /// Best-effort error message: JSON `message`, then `error`, then the raw body.
    pub fn error_message(&self) -> String {
        let from_json = self.body.as_ref().and_then(|body| {
            ["message", "error_description", "error"]
                .iter()
                .find_map(|key| body.get(*key).and_then(Value::as_str))
                .map(str::to_string)
        });

        match from_json {
            Some(msg) if !msg.is_empty() => msg,
            _ if self.raw_body.trim().is_empty() => format!("HTTP {}", self.status),
            _ => truncate_for_log(self.raw_body.trim()),
        }
    }
}

/// `application/json` and any `+json` media type, ignoring parameters.
fn is_json_content_type(value: &str) -> bool {
    let media_type = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}
