//! Identifiers carried by a sync string.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use super::Error;

/// The two identifier shapes a sync string can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdKind {
    /// Non-negative integers.
    Int,
    /// UUIDs.
    Uuid,
}

/// A record identifier: an integer primary key or a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyncId {
    /// An integer primary key.
    Int(u64),
    /// A UUID primary key.
    Uuid(Uuid),
}

impl SyncId {
    /// The shape of this identifier.
    pub fn kind(&self) -> IdKind {
        match self {
            SyncId::Int(_) => IdKind::Int,
            SyncId::Uuid(_) => IdKind::Uuid,
        }
    }
}

impl From<u64> for SyncId {
    fn from(value: u64) -> Self {
        SyncId::Int(value)
    }
}

impl From<Uuid> for SyncId {
    fn from(value: Uuid) -> Self {
        SyncId::Uuid(value)
    }
}

/// Integers print in decimal, UUIDs in the dashed 8-4-4-4-12 form.
impl fmt::Display for SyncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncId::Int(value) => write!(f, "{value}"),
            SyncId::Uuid(value) => write!(f, "{}", value.hyphenated()),
        }
    }
}

impl FromStr for SyncId {
    type Err = Error;

    /// Canonical decimal text is an integer id, anything `uuid` accepts is a
    /// UUID id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(value) = parse_canonical_u64(s) {
            return Ok(SyncId::Int(value));
        }
        Uuid::try_parse(s)
            .map(SyncId::Uuid)
            .map_err(|_| Error::InvalidIdentifier(s.to_string()))
    }
}

/// Parses decimal text that prints back identically, so `"007"` and `"+7"`
/// are not integers.
pub(super) fn parse_canonical_u64(s: &str) -> Option<u64> {
    s.parse::<u64>().ok().filter(|value| value.to_string() == s)
}
