//! Test helpers.

use crate::sync::{Compressor, Error};

/// A compressor that writes text as lowercase hex. Its tokens are easy to
/// build by hand and never contain a comma, which makes sync strings
/// readable in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexCompressor;

impl Compressor for HexCompressor {
    fn compress(&self, text: &str) -> String {
        hex::encode(text)
    }

    fn decompress(&self, token: &str) -> Result<String, Error> {
        let bytes = hex::decode(token).map_err(|_| Error::Compressor(token.to_string()))?;
        String::from_utf8(bytes).map_err(|_| Error::Compressor(token.to_string()))
    }
}
