//! Local record types
//!
//! Records as produced by the zone-file parser, before normalization into
//! the provider's flattened shape.

use serde::{Deserialize, Serialize};

/// Record types that take part in synchronization.
///
/// Anything outside this set is carried through parsing as
/// [`RecordData::Other`] and ignored by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Srv,
    Txt,
}

/// Record types whose data must end in a trailing dot on the provider side.
///
/// Every variant converts into a [`RecordType`], so this set is a subset of
/// the supported types by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrailingDotType {
    Cname,
    Mx,
    Ns,
}

impl From<TrailingDotType> for RecordType {
    fn from(value: TrailingDotType) -> Self {
        match value {
            TrailingDotType::Cname => Self::Cname,
            TrailingDotType::Mx => Self::Mx,
            TrailingDotType::Ns => Self::Ns,
        }
    }
}

impl RecordType {
    /// Every supported type, in display order.
    pub const ALL: [Self; 7] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Mx,
        Self::Ns,
        Self::Srv,
        Self::Txt,
    ];

    /// Upper-case mnemonic as used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Srv => "SRV",
            Self::Txt => "TXT",
        }
    }

    /// Case-insensitive lookup; `None` for unsupported types.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// The trailing-dot classification of this type, if it has one.
    pub fn trailing_dot(self) -> Option<TrailingDotType> {
        match self {
            Self::Cname => Some(TrailingDotType::Cname),
            Self::Mx => Some(TrailingDotType::Mx),
            Self::Ns => Some(TrailingDotType::Ns),
            Self::A | Self::Aaaa | Self::Srv | Self::Txt => None,
        }
    }

    /// Whether the provider expects this type's data to end in a dot.
    pub fn needs_trailing_dot(self) -> bool {
        self.trailing_dot().is_some()
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific record data.
///
/// Host names (`target`, `exchange`, `host`) are fully qualified and carry no
/// trailing dot; the normalizer adds one where the provider requires it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum RecordData {
    A {
        address: String,
    },
    Aaaa {
        address: String,
    },
    Cname {
        target: String,
    },
    Mx {
        preference: u16,
        exchange: String,
    },
    Ns {
        host: String,
    },
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    Txt {
        text: String,
    },
    /// A record type outside the synchronized set, kept verbatim.
    Other {
        record_type: String,
        rdata: String,
    },
}

impl RecordData {
    /// The supported type of this data, or `None` for [`RecordData::Other`].
    pub fn record_type(&self) -> Option<RecordType> {
        match self {
            Self::A { .. } => Some(RecordType::A),
            Self::Aaaa { .. } => Some(RecordType::Aaaa),
            Self::Cname { .. } => Some(RecordType::Cname),
            Self::Mx { .. } => Some(RecordType::Mx),
            Self::Ns { .. } => Some(RecordType::Ns),
            Self::Srv { .. } => Some(RecordType::Srv),
            Self::Txt { .. } => Some(RecordType::Txt),
            Self::Other { .. } => None,
        }
    }

    /// Type mnemonic, including unsupported types.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Other { record_type, .. } => record_type,
            _ => self.record_type().map_or("", RecordType::as_str),
        }
    }
}

/// A record parsed from local zone-file text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalRecord {
    /// Fully qualified owner name, normally with a trailing dot.
    pub name: String,
    pub ttl: u32,
    pub data: RecordData,
}

impl LocalRecord {
    pub fn new(name: impl Into<String>, ttl: u32, data: RecordData) -> Self {
        Self {
            name: name.into(),
            ttl,
            data,
        }
    }

    /// The supported type of this record, if any.
    pub fn record_type(&self) -> Option<RecordType> {
        self.data.record_type()
    }
}
