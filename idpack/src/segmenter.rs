//! # Windowed Segmentation
//!
//! This module turns an ordered sequence of runs into the token stream of
//! `Spaces`, `Range` and `Bitmap` segments.
//!
//! ## Algorithm
//!
//! The segmenter is a two-state machine driven by one run at a time. The
//! gap before each run is measured from the previous run's last identifier
//! (starting from zero).
//!
//! * **Idle**: emit `Spaces(gap)` (even when the gap is zero), then either
//!   emit a long run directly as `Range`, or start buffering a short one.
//! * **Grouping**: compare the span from the first buffered identifier to
//!   the end of the incoming run against the window size:
//!   - equal: the run completes the window, flush everything as one `Bitmap`
//!   - greater: flush the buffer (a lone run as `Range`), emit the gap, and
//!     treat the incoming run as if idle
//!   - smaller: keep buffering
//!
//! The window bounds a bitmap's width to `window_size` bits, while dense but
//! irregular clusters still collapse into a single token instead of many
//! small `Spaces`/`Range` pairs. Window sizes are 16-bit, so a bitmap never
//! spans more than `u16::MAX` slots.

use std::cmp::Ordering;
use std::num::NonZeroU16;

use crate::run::Run;
use crate::segments::Segments;
use crate::Segment;

/// Default threshold for folding clusters of runs into one bitmap.
pub const DEFAULT_WINDOW_SIZE: NonZeroU16 = match NonZeroU16::new(10) {
    Some(size) => size,
    None => unreachable!(),
};

/// Trait for segmenting runs into encodable segments.
pub trait Segmenter {
    /// Segments the input runs into a series of segments.
    ///
    /// ## Parameters
    /// * `runs` - Maximal, ascending, non-adjacent runs, as produced by
    ///   [`extract_runs`](crate::extract_runs).
    fn package(&self, runs: &[Run]) -> Segments;
}

/// Segmentation state between two runs.
#[derive(Debug)]
enum State {
    /// No runs are buffered.
    Idle,
    /// Short runs are buffered for a bitmap starting at `current_start`.
    Grouping {
        current_start: u64,
        buffer: Vec<Run>,
    },
}

/// A segmenter that folds clusters of short runs into bitmaps no wider than
/// its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSegmenter {
    window_size: NonZeroU16,
}

impl Default for WindowSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl WindowSegmenter {
    /// Creates a segmenter with the given window size.
    pub fn new(window_size: NonZeroU16) -> Self {
        Self { window_size }
    }

    /// The configured window size.
    pub fn window_size(&self) -> NonZeroU16 {
        self.window_size
    }

    /// Handles a run while no runs are buffered: a run at least as long as
    /// the window is emitted directly, anything shorter opens a group.
    fn open(&self, run: &Run, segments: &mut Segments) -> State {
        if run.len() >= u64::from(self.window_size.get()) {
            segments.push(Segment::Range(run.len()));
            State::Idle
        } else {
            State::Grouping {
                current_start: run.start(),
                buffer: vec![*run],
            }
        }
    }

    /// Emits the buffered runs as a single segment.
    fn flush(buffer: &[Run], segments: &mut Segments) {
        if let Some(segment) = Segment::from_runs(buffer) {
            segments.push(segment);
        }
    }
}

impl Segmenter for WindowSegmenter {
    fn package(&self, runs: &[Run]) -> Segments {
        let window = u128::from(self.window_size.get());
        let mut segments = Segments::default();
        let mut state = State::Idle;
        let mut previous_end = 0;

        for run in runs {
            let gap = run.start() - previous_end;

            state = match state {
                State::Idle => {
                    segments.push(Segment::Spaces(gap));
                    self.open(run, &mut segments)
                }
                State::Grouping {
                    current_start,
                    mut buffer,
                } => {
                    // Widened so that a span over the whole u64 domain
                    // cannot wrap.
                    let span = u128::from(run.end() - current_start) + 1;
                    match span.cmp(&window) {
                        Ordering::Equal => {
                            buffer.push(*run);
                            Self::flush(&buffer, &mut segments);
                            State::Idle
                        }
                        Ordering::Greater => {
                            Self::flush(&buffer, &mut segments);
                            segments.push(Segment::Spaces(gap));
                            self.open(run, &mut segments)
                        }
                        Ordering::Less => {
                            buffer.push(*run);
                            State::Grouping { current_start, buffer }
                        }
                    }
                }
            };

            previous_end = run.end();
        }

        if let State::Grouping { buffer, .. } = state {
            Self::flush(&buffer, &mut segments);
        }

        tracing::trace!(
            runs = runs.len(),
            segments = segments.len(),
            window_size = self.window_size.get(),
            "packaged runs into segments"
        );

        segments
    }
}
