//! String compression used for sync-string fields.

use super::Error;

/// A lossless text compressor.
///
/// Implementations must satisfy `decompress(compress(s)) == Ok(s)` for
/// every `s`, and `compress` must never emit a comma since commas delimit
/// the fields of a sync string. Compressors are stateless; a single value
/// may be shared between threads.
pub trait Compressor {
    /// Compresses `text` into a comma-free token.
    fn compress(&self, text: &str) -> String;

    /// Restores the text behind a token produced by [`Compressor::compress`].
    fn decompress(&self, token: &str) -> Result<String, Error>;
}

/// LZ-String compression with the URI-component output alphabet
/// (`A-Za-z0-9+-$`), as produced by `compressToEncodedURIComponent` in the
/// JavaScript `lz-string` library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LzString;

impl Compressor for LzString {
    fn compress(&self, text: &str) -> String {
        lz_str::compress_to_encoded_uri_component(text)
    }

    fn decompress(&self, token: &str) -> Result<String, Error> {
        let units = lz_str::decompress_from_encoded_uri_component(token)
            .ok_or_else(|| Error::Compressor(token.to_string()))?;
        String::from_utf16(&units).map_err(|_| Error::Compressor(token.to_string()))
    }
}
