//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use zone_sync_provider::ProviderError;

use crate::types::StatusCode;
use crate::zonefile::ZoneFileError;

/// Which half of a zone save a bulk chunk belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Delete,
    Create,
}

impl std::fmt::Display for BulkAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delete => write!(f, "delete"),
            Self::Create => write!(f, "create"),
        }
    }
}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Missing or malformed caller input
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// More than one cached zone claims the same domain
    #[error("Ambiguous zone: {count} zones match {domain}")]
    AmbiguousZone { domain: String, count: usize },

    /// No cached zone matches the domain
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    /// The supplied zone-file text could not be parsed
    #[error("Failed to parse zone data for {zone}: {source}")]
    ZoneFileParse {
        zone: String,
        #[source]
        source: ZoneFileError,
    },

    /// A bulk chunk was rejected; later chunks were not sent
    #[error("Bulk {action} chunk {chunk}/{total} failed for zone {zone}: {source}")]
    BulkChunkFailed {
        zone: String,
        action: BulkAction,
        chunk: usize,
        total: usize,
        #[source]
        source: ProviderError,
    },

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ValidationError(_) | Self::ZoneNotFound(_) | Self::AmbiguousZone { .. } => true,
            Self::Provider(e) | Self::BulkChunkFailed { source: e, .. } => e.is_expected(),
            Self::ZoneFileParse { .. } => false,
        }
    }

    /// Status code reported to the host for this failure.
    ///
    /// Parse failures are logged server-side in full and reported as
    /// [`StatusCode::FailureLogged`], since the raw zone text can be large.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ZoneFileParse { .. } => StatusCode::FailureLogged,
            _ => StatusCode::Failure,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
