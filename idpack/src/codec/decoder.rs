//! Parsing of prefix-delimited text back into segments.

use crate::alphabet::Alphabet;
use crate::segment::{BITMAP_PREFIX, RANGE_PREFIX, SPACES_PREFIX};
use crate::{Segment, Segments};

use super::{Decodable, DecodeError};

/// A segment whose digits are still being collected.
struct Pending<'a> {
    prefix: char,
    position: usize,
    digits: &'a str,
}

impl Pending<'_> {
    /// Decodes the collected digits into a segment. No digits at all read
    /// as zero.
    fn resolve(&self, alphabet: &Alphabet) -> Result<Segment, DecodeError> {
        let segment = match self.prefix {
            SPACES_PREFIX => Segment::Spaces(alphabet.decode(self.digits)?),
            RANGE_PREFIX => Segment::Range(alphabet.decode(self.digits)?),
            _ => Segment::Bitmap(alphabet.decode_magnitude(self.digits)?),
        };

        Ok(segment)
    }
}

/// Returns `true` for the three segment prefix characters.
fn is_prefix(symbol: char) -> bool {
    matches!(symbol, SPACES_PREFIX | RANGE_PREFIX | BITMAP_PREFIX)
}

impl Decodable for Segments {
    /// Splits `encoded` at every prefix character and decodes each segment's
    /// numeral. The empty string decodes to no segments, symbols before the
    /// first prefix belong to no segment and are skipped.
    ///
    /// ## Errors
    /// - A character that is neither a prefix nor an alphabet symbol
    ///   (`Alphabet(InvalidSymbol)`)
    fn decode(encoded: &str, alphabet: &Alphabet) -> Result<Self, DecodeError> {
        let mut segments = Segments::default();
        let mut pending: Option<Pending> = None;

        for (position, symbol) in encoded.char_indices() {
            if is_prefix(symbol) {
                if let Some(previous) = pending.take() {
                    segments.push(previous.resolve(alphabet)?);
                }
                pending = Some(Pending {
                    prefix: symbol,
                    position,
                    digits: "",
                });
                continue;
            }

            // Validate eagerly so that corrupted text is reported as such,
            // regardless of where the foreign symbol sits.
            alphabet.digit(symbol)?;

            let Some(current) = pending.as_mut() else {
                continue;
            };
            let digits_start = current.position + current.prefix.len_utf8();
            current.digits = &encoded[digits_start..position + symbol.len_utf8()];
        }

        if let Some(last) = pending {
            segments.push(last.resolve(alphabet)?);
        }

        Ok(segments)
    }
}
