//! Response types returned to the host caller

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Outcome class of an inbound operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    /// The operation completed.
    Success,
    /// The operation failed; the message is fit for display.
    Failure,
    /// The operation failed and the details were written to the log only.
    FailureLogged,
}

impl StatusCode {
    /// Numeric code understood by the host (`1`, `0`, `-1`).
    #[must_use]
    pub fn code(self) -> i8 {
        match self {
            Self::Success => 1,
            Self::Failure => 0,
            Self::FailureLogged => -1,
        }
    }

    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// `(status, message)` pair returned by every [`ZoneSyncService`] operation.
///
/// [`ZoneSyncService`]: crate::services::ZoneSyncService
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub status: StatusCode,
    pub message: String,
}

impl OperationResult {
    /// Successful result carrying `message`.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::Success,
            message: message.into(),
        }
    }

    /// Failed result derived from a core error.
    #[must_use]
    pub fn from_error(err: &CoreError) -> Self {
        Self {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

impl From<Result<String, CoreError>> for OperationResult {
    fn from(result: Result<String, CoreError>) -> Self {
        match result {
            Ok(message) => Self::success(message),
            Err(err) => Self::from_error(&err),
        }
    }
}
