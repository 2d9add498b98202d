//! Segment encoding into prefix-delimited text.

use crate::alphabet::Alphabet;
use crate::{Segment, Segments};

use super::Encodable;

impl Encodable for Segment {
    /// Writes the prefix followed by the segment's value in base K.
    fn encode(&self, alphabet: &Alphabet) -> String {
        let digits = match self {
            Segment::Spaces(n) | Segment::Range(n) => alphabet.encode(*n),
            Segment::Bitmap(bits) => alphabet.encode_magnitude(bits),
        };

        let mut encoded = String::with_capacity(digits.len() + 1);
        encoded.push(self.prefix());
        encoded.push_str(&digits);
        encoded
    }
}

impl Encodable for Segments {
    /// Concatenates the encoded segments; no segments encode as `""`.
    fn encode(&self, alphabet: &Alphabet) -> String {
        self.iter().map(|segment| segment.encode(alphabet)).collect()
    }
}
