use crate::codec::DecodeError;
use crate::Segment;

/// Ordered collection of segments making up one encoded id pack.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Segments(Vec<Segment>);

/// Enables conversion of a Segments instance into an iterator.
impl IntoIterator for Segments {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Segments {
    /// Creates a new `Segments` instance from an iterator of segments.
    pub fn new_from<I>(segments: I) -> Self
    where
        I: IntoIterator<Item = Segment>,
    {
        Self(segments.into_iter().collect())
    }

    /// Pushes a new segment to the end of the inner segments list.
    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    /// Returns the number of segments in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no segments in the collection.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the inner segments.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.0.iter()
    }

    /// Resolves the segments into the identifiers they represent, sorted and
    /// de-duplicated.
    ///
    /// A cursor walks the identifier space. Each segment covers the slots
    /// from the cursor up to its end; the following segment starts on that
    /// end slot when it is a `Spaces` segment and one past it otherwise.
    /// This mirrors the encoder, which measures every gap from the previous
    /// run's last identifier rather than from the slot after it.
    ///
    /// ## Errors
    /// - More than `limit` identifiers would be produced, when a limit is
    ///   given (`TooManyValues`)
    /// - The cursor leaves the `u64` identifier domain (`ArithmeticOverflow`)
    pub fn values(&self, limit: Option<u64>) -> Result<Vec<u64>, DecodeError> {
        let mut values = Vec::new();

        // The cursor is signed and wider than an identifier: a leading
        // `Spaces(0)` legitimately ends one slot before zero.
        let mut start: i128 = 0;

        for (position, segment) in self.0.iter().enumerate() {
            let width = match segment {
                Segment::Spaces(n) => i128::from(*n),
                Segment::Range(n) => {
                    check_limit(values.len(), *n, limit)?;
                    for offset in 0..*n {
                        values.push(to_id(start + i128::from(offset))?);
                    }
                    i128::from(*n)
                }
                Segment::Bitmap(bits) => {
                    let bits = bits.to_bits();
                    check_limit(values.len(), bits.count_ones() as u64, limit)?;
                    for offset in bits.iter_ones() {
                        values.push(to_id(start + offset as i128)?);
                    }
                    bits.len() as i128
                }
            };

            let end = start + width - 1;
            let next_is_spaces = self
                .0
                .get(position + 1)
                .is_some_and(|next| next.is_spaces());
            start = if next_is_spaces { end } else { end + 1 };
        }

        values.sort_unstable();
        values.dedup();
        Ok(values)
    }
}

/// Converts a cursor position into an identifier.
fn to_id(position: i128) -> Result<u64, DecodeError> {
    u64::try_from(position).map_err(|_| DecodeError::ArithmeticOverflow(position))
}

/// Ensures that adding `additional` values stays within `limit`, if any.
fn check_limit(current: usize, additional: u64, limit: Option<u64>) -> Result<(), DecodeError> {
    let total = (current as u64).saturating_add(additional);
    match limit {
        Some(limit) if total > limit => Err(DecodeError::TooManyValues(total)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magnitude::Magnitude;
    use assert_matches::assert_matches;
    use test_case::test_case;

    const NO_LIMIT: Option<u64> = None;

    #[test_case(vec![Segment::Spaces(4), Segment::Range(2)], &[4, 5]; "range starts after the gap")]
    #[test_case(vec![Segment::Range(2)], &[0, 1]; "range from zero")]
    #[test_case(vec![Segment::Spaces(0), Segment::Range(1)], &[0]; "leading empty spaces")]
    #[test_case(
        vec![Segment::Spaces(5), Segment::Range(2), Segment::Spaces(15), Segment::Bitmap(Magnitude::from(0b10101))],
        &[5, 6, 21, 23, 25];
        "reference vector"
    )]
    #[test_case(
        vec![Segment::Spaces(0), Segment::Bitmap(Magnitude::from(0b10_1000_0001)), Segment::Spaces(11), Segment::Range(1)],
        &[0, 2, 9, 20];
        "bitmap followed by spaces"
    )]
    #[test_case(vec![], &[]; "no segments")]
    fn test_values(segments: Vec<Segment>, expected: &[u64]) {
        let segments = Segments::new_from(segments);
        assert_eq!(segments.values(NO_LIMIT).unwrap(), expected);
    }

    #[test]
    fn test_overlapping_segments_are_deduplicated() {
        // `Spaces(0)` pulls the cursor back onto the range's last slot.
        let segments = Segments::new_from([
            Segment::Range(1),
            Segment::Spaces(0),
            Segment::Range(1),
        ]);
        assert_eq!(segments.values(NO_LIMIT).unwrap(), vec![0]);
    }

    #[test]
    fn test_value_limit() {
        let segments = Segments::new_from([Segment::Range(1_000)]);
        assert_matches!(segments.values(Some(999)), Err(DecodeError::TooManyValues(1_000)));
        assert_eq!(segments.values(Some(1_000)).unwrap().len(), 1_000);
        assert_eq!(segments.values(NO_LIMIT).unwrap().len(), 1_000);
    }

    #[test]
    fn test_identifier_overflow() {
        let segments = Segments::new_from([Segment::Spaces(u64::MAX), Segment::Range(3)]);
        assert_matches!(
            segments.values(NO_LIMIT),
            Err(DecodeError::ArithmeticOverflow(_))
        );
    }
}
