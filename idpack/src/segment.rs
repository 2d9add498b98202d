//! A single token of an encoded id pack.
//!
//! Every segment renders as a one-character prefix followed by its value as
//! a base-K numeral:
//!
//! | Prefix | Segment   | Value                                         |
//! |--------|-----------|-----------------------------------------------|
//! | `_`    | `Spaces`  | number of absent identifier slots             |
//! | `~`    | `Range`   | number of consecutive present identifiers     |
//! | `.`    | `Bitmap`  | present/absent pattern, most significant first |
//!
//! A bitmap's first bit is always `1`, since it starts at the first
//! identifier of the first run it covers.

use bitvec::prelude::{BitVec, Msb0};

use crate::magnitude::Magnitude;
use crate::run::Run;

/// Prefix of a `Spaces` segment.
pub const SPACES_PREFIX: char = '_';

/// Prefix of a `Range` segment.
pub const RANGE_PREFIX: char = '~';

/// Prefix of a `Bitmap` segment.
pub const BITMAP_PREFIX: char = '.';

/// One decoded or to-be-encoded segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `n` consecutive absent identifier slots.
    Spaces(u64),
    /// `n` consecutive present identifiers.
    Range(u64),
    /// An explicit present/absent pattern over a contiguous window.
    Bitmap(Magnitude),
}

impl Segment {
    /// Folds a buffer of runs into one segment: a lone run becomes a
    /// `Range`, several runs become a `Bitmap` starting at the first run.
    ///
    /// Returns `None` for an empty buffer.
    pub fn from_runs(runs: &[Run]) -> Option<Self> {
        match runs {
            [] => None,
            [run] => Some(Self::Range(run.len())),
            _ => Some(Self::Bitmap(bitmap_of(runs))),
        }
    }

    /// The prefix character this segment is rendered with.
    pub fn prefix(&self) -> char {
        match self {
            Self::Spaces(_) => SPACES_PREFIX,
            Self::Range(_) => RANGE_PREFIX,
            Self::Bitmap(_) => BITMAP_PREFIX,
        }
    }

    /// Returns `true` for a `Spaces` segment.
    pub fn is_spaces(&self) -> bool {
        matches!(self, Self::Spaces(_))
    }
}

/// Builds the bit pattern for consecutive runs: ones for each run, and for
/// each run after the first, one zero per absent identifier since the
/// previous run's end.
fn bitmap_of(runs: &[Run]) -> Magnitude {
    let mut bits: BitVec<u8, Msb0> = BitVec::new();
    let mut previous: Option<&Run> = None;

    for run in runs {
        if let Some(previous) = previous {
            let absent = run.start() - previous.end() - 1;
            bits.resize(bits.len() + absent as usize, false);
        }
        bits.resize(bits.len() + run.len() as usize, true);
        previous = Some(run);
    }

    Magnitude::from_bits(&bits)
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spaces(n) => write!(f, "Spaces({n})"),
            Self::Range(n) => write!(f, "Range({n})"),
            Self::Bitmap(bits) => write!(f, "Bitmap({})", bits.bit_len()),
        }
    }
}
