//! Zone-file text handling
//!
//! [`ZoneFileParser`] turns master-file text into [`LocalRecord`]s;
//! [`render_zone`] formats a cached zone back into text.

mod parser;
mod render;

pub use parser::BasicZoneParser;
pub use render::render_zone;

use serde::Serialize;

use crate::types::LocalRecord;

/// A zone-file syntax error with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneFileError {
    pub line: usize,
    pub message: String,
}

impl ZoneFileError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ZoneFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ZoneFileError {}

/// Parses zone-file text for one zone into an ordered record list.
pub trait ZoneFileParser: Send + Sync {
    /// Parse `text` with `zone` as the initial origin.
    fn parse(&self, zone: &str, text: &str) -> Result<Vec<LocalRecord>, ZoneFileError>;
}
