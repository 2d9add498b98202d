#![deny(missing_docs)]

//! # IDPack: Compact Identifier Set Encoding
//!
//! `idpack` turns a set of non-negative integer identifiers into a short,
//! URL-friendly string, so that a client can tell a server which records it
//! already holds without sending the raw list.
//!
//! ## Usage Example
//!
//! ```
//! let encoded = idpack::encode([5, 6, 21, 23, 25]);
//! assert_eq!(encoded, "_F~C_P.V");
//!
//! assert_eq!(idpack::decode(&encoded), vec![5, 6, 21, 23, 25]);
//! ```
//!
//! ## Format
//!
//! An encoded id pack is a sequence of segments, each a prefix character
//! followed by a base-K numeral:
//!
//! * `_n`: `n` absent identifier slots
//! * `~n`: `n` consecutive present identifiers
//! * `.n`: a bitmap whose binary expansion marks present identifiers
//!
//! Sparse data is dominated by `Spaces`, long streaks by `Range`, and dense
//! irregular clusters are folded into a single `Bitmap` by the
//! [`WindowSegmenter`].
//!
//! ## Architecture
//!
//! * **Runs**: [`extract_runs`] sorts and collapses ids into maximal runs
//! * **Segmenter**: [`WindowSegmenter`] chooses a segment for each stretch
//! * **Codec**: [`Encodable`] / [`Decodable`] over an [`Alphabet`]
//! * **Packer**: [`IdPacker`] ties the pipeline to a [`Config`]
//! * **Sync**: [`sync::SyncCodec`] encodes `{id -> last synced at}` maps
//!
//! ## Corrupted Input
//!
//! Decoding untrusted text never fails the caller: [`IdPacker::decode`] and
//! [`sync::SyncCodec::decode`] return an empty result for corrupted input.
//! The `try_decode` variants report the reason instead.

pub mod alphabet;
pub mod codec;
pub mod config;
pub mod error;
mod magnitude;
mod packer;
mod run;
mod segment;
mod segmenter;
mod segments;
pub mod sync;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(test)]
mod tests;

pub use alphabet::Alphabet;
pub use codec::{Decodable, DecodeError, Encodable};
pub use config::Config;
pub use error::Error;
pub use magnitude::Magnitude;
pub use packer::IdPacker;
pub use run::{extract_runs, InvertedRun, Run};
pub use segment::Segment;
pub use segmenter::{Segmenter, WindowSegmenter, DEFAULT_WINDOW_SIZE};
pub use segments::Segments;

/// Encodes `ids` with the default [`Config`].
pub fn encode<I>(ids: I) -> String
where
    I: IntoIterator<Item = u64>,
{
    IdPacker::default().encode(ids)
}

/// Decodes an id pack written with the default [`Config`].
///
/// Corrupted input yields an empty list.
pub fn decode(encoded: &str) -> Vec<u64> {
    IdPacker::default().decode(encoded)
}
