//! Contiguous runs of identifiers.
//!
//! # Invariants
//!
//! Runs produced by [`extract_runs`]:
//! - **Never empty**: `start <= end`
//! - **Ordered**: ascending by `start`
//! - **Disjoint and non-adjacent**: at least one absent identifier separates
//!   consecutive runs, so every run is maximal

/// Error returned when constructing a run with inverted bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("run start {start} is greater than its end {end}")]
pub struct InvertedRun {
    /// Requested first identifier.
    pub start: u64,
    /// Requested last identifier.
    pub end: u64,
}

/// An inclusive interval `[start, end]` of present identifiers.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    start: u64,
    end: u64,
}

impl Run {
    /// Creates a run over `[start, end]`.
    pub fn new(start: u64, end: u64) -> Result<Self, InvertedRun> {
        if start > end {
            return Err(InvertedRun { start, end });
        }
        Ok(Self { start, end })
    }

    /// A run holding a single identifier.
    pub fn single(id: u64) -> Self {
        Self { start: id, end: id }
    }

    /// First identifier of the run.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last identifier of the run.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of identifiers in the run.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        // A run over the entire u64 domain cannot be materialised from a
        // set of identifiers, so saturating here never loses information.
        (self.end - self.start).saturating_add(1)
    }

    /// Returns `true` if `id` directly follows the end of this run.
    fn is_followed_by(&self, id: u64) -> bool {
        self.end.checked_add(1) == Some(id)
    }
}

/// Renders as `start..end`, matching the way runs are written in docs.
impl std::fmt::Debug for Run {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Groups identifiers into maximal contiguous runs.
///
/// The input may be in any order and may contain duplicates; it is sorted
/// and de-duplicated first. An empty input produces no runs.
///
/// ```
/// use idpack::{extract_runs, Run};
///
/// let runs = extract_runs([25, 5, 23, 6, 21]);
/// assert_eq!(
///     runs,
///     vec![Run::new(5, 6).unwrap(), Run::single(21), Run::single(23), Run::single(25)]
/// );
/// ```
pub fn extract_runs<I>(ids: I) -> Vec<Run>
where
    I: IntoIterator<Item = u64>,
{
    let mut ids: Vec<u64> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();

    let mut runs: Vec<Run> = Vec::new();
    for id in ids {
        match runs.last_mut() {
            Some(run) if run.is_followed_by(id) => run.end = id,
            _ => runs.push(Run::single(id)),
        }
    }

    runs
}
