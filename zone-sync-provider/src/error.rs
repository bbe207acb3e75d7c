use serde::{Deserialize, Serialize};

/// Unified error type for all DNS API operations.
///
/// Nothing in this crate retries. Every variant is handed back to the caller,
/// which decides whether the operation is worth repeating.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The request did not complete within the configured timeout.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The OAuth2 client-credentials exchange was rejected or returned no bearer token.
    AuthenticationFailed {
        /// Original error message from the identity endpoint, if available.
        raw_message: Option<String>,
    },

    /// The API answered with a non-success status.
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// A JSON-typed response could not be decoded into the expected shape.
    ParseError {
        /// Error details.
        detail: String,
    },

    /// A request parameter was rejected before anything was sent.
    InvalidParameter {
        /// Name of the offending parameter.
        param: String,
        /// Why it was rejected.
        detail: String,
    },

    /// A cursor-paginated listing returned an inconsistent cursor.
    PaginationError {
        /// Error details.
        detail: String,
    },
}

impl ProviderError {
    /// Whether this is expected behavior (bad input, missing resource, rejected credentials).
    ///
    /// Returning `true` means the caller should log at `warn`, `false` at `error`.
    /// **Update this method whenever a variant is added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::AuthenticationFailed { .. } | Self::InvalidParameter { .. } => true,
            Self::ApiError { status, .. } => (400..500).contains(status),
            Self::NetworkError { .. }
            | Self::Timeout { .. }
            | Self::ParseError { .. }
            | Self::PaginationError { .. } => false,
        }
    }

    /// HTTP status carried by the error, if the API produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Request timeout: {detail}"),
            Self::AuthenticationFailed { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Authentication failed: {msg}")
                } else {
                    write!(f, "Authentication failed")
                }
            }
            Self::ApiError { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            Self::ParseError { detail } => write!(f, "Parse error: {detail}"),
            Self::InvalidParameter { param, detail } => {
                write!(f, "Invalid parameter '{param}': {detail}")
            }
            Self::PaginationError { detail } => write!(f, "Pagination error: {detail}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = ProviderError::NetworkError {
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "Network error: connection refused");
    }

    #[test]
    fn display_authentication_failed_with_message() {
        let e = ProviderError::AuthenticationFailed {
            raw_message: Some("invalid_client".to_string()),
        };
        assert_eq!(e.to_string(), "Authentication failed: invalid_client");
    }

    #[test]
    fn display_authentication_failed_without_message() {
        let e = ProviderError::AuthenticationFailed { raw_message: None };
        assert_eq!(e.to_string(), "Authentication failed");
    }

    #[test]
    fn display_api_error() {
        let e = ProviderError::ApiError {
            status: 422,
            message: "zone already exists".to_string(),
        };
        assert_eq!(e.to_string(), "API error (HTTP 422): zone already exists");
    }

    #[test]
    fn display_invalid_parameter() {
        let e = ProviderError::InvalidParameter {
            param: "page_size".to_string(),
            detail: "must be > 0".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid parameter 'page_size': must be > 0");
    }

    #[test]
    fn client_errors_are_expected() {
        let e = ProviderError::ApiError {
            status: 404,
            message: "not found".to_string(),
        };
        assert!(e.is_expected());
        assert_eq!(e.status(), Some(404));
    }

    #[test]
    fn server_errors_are_not_expected() {
        let e = ProviderError::ApiError {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(!e.is_expected());
    }

    #[test]
    fn transport_failures_are_not_expected() {
        let e = ProviderError::Timeout {
            detail: "30s elapsed".to_string(),
        };
        assert!(!e.is_expected());
        assert_eq!(e.status(), None);
    }

    #[test]
    fn serializes_with_code_tag() {
        let e = ProviderError::PaginationError {
            detail: "cursor did not advance".to_string(),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["code"], "PaginationError");
        assert_eq!(json["detail"], "cursor did not advance");
    }
}
