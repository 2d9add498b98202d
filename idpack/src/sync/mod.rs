//! # Sync strings
//!
//! A sync string tells a server when each cached record was last synced.
//! It is a comma-separated list of compressed fields:
//!
//! ```text
//! min_ts, ids_0, delta_0, ids_1, delta_1, ...
//! ```
//!
//! `min_ts` is the smallest timestamp in the mapping. Every following pair
//! names a group of identifiers sharing one timestamp, stored as its
//! distance from `min_ts`. Integer groups are comma-joined decimals, UUID
//! groups are the dash-less hex forms laid end to end. Each field is passed
//! through a [`Compressor`] whose output never contains a comma.
//!
//! Unlike an id pack, a sync string does not use the segment scheme at all;
//! the compressor is expected to find the redundancy in the plain text.

mod codec;
mod compressor;
mod id;

pub use codec::SyncCodec;
pub use compressor::Compressor;
pub use compressor::LzString;
pub use id::IdKind;
pub use id::SyncId;

/// Reasons a sync string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The compressor could not restore a field.
    #[error("could not decompress {0:?}")]
    Compressor(String),

    /// A field between two commas is empty.
    #[error("field {0} is empty")]
    MissingField(usize),

    /// The fields after the minimum timestamp do not come in pairs.
    #[error("expected identifier and delta pairs after the minimum timestamp, got {0} fields")]
    UnpairedField(usize),

    /// A decompressed timestamp or delta is not a decimal integer.
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    /// A decompressed identifier group contains neither integers nor UUIDs.
    #[error("invalid identifier group {0:?}")]
    InvalidIdentifier(String),

    /// The reconstructed timestamp does not fit in an `i64`.
    #[error("timestamp overflow: {0}")]
    TimestampOverflow(i128),
}
