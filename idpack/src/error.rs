//! Top-level error type for the idpack library
//!

use crate::{alphabet, codec, sync};

/// Errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value handed to the encoder was negative, fractional or not a
    /// number at all.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An alphabet could not be built or a numeral could not be decoded.
    #[error(transparent)]
    Alphabet(#[from] alphabet::Error),

    /// An id pack could not be decoded.
    #[error(transparent)]
    Decode(#[from] codec::DecodeError),

    /// A sync string could not be decoded.
    #[error(transparent)]
    Sync(#[from] sync::Error),
}
