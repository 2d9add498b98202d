//! Text encoding of segment collections.
//!
//! An encoded id pack is the concatenation of its segments, each written as
//! a prefix character followed by a base-K numeral over an [`Alphabet`].
//! Since prefixes are never alphabet symbols, the text is self-delimiting.

use crate::alphabet::{self, Alphabet};

mod decoder;
mod encoder;

/// Trait for types that can be rendered as an encoded string.
pub trait Encodable {
    /// Encodes the implementing type using the symbols of `alphabet`.
    fn encode(&self, alphabet: &Alphabet) -> String;
}

/// Trait for types that can be parsed from an encoded string.
pub trait Decodable: Sized {
    /// Decodes an instance from `encoded`, whose numerals use the symbols
    /// of `alphabet`.
    fn decode(encoded: &str, alphabet: &Alphabet) -> Result<Self, DecodeError>;
}

/// Errors that can occur while decoding an id pack.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A numeral could not be decoded.
    #[error("error decoding numeral: {0}")]
    Alphabet(#[from] alphabet::Error),

    /// An identifier fell outside the `u64` domain.
    #[error("identifier position {0} is outside the u64 range")]
    ArithmeticOverflow(i128),

    /// More identifiers than allowed would be produced.
    #[error("decoded value count limit exceeded: {0}")]
    TooManyValues(u64),
}
