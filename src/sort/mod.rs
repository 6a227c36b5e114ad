//! Sorting step generation.
//!
//! Each algorithm is modeled as an explicit finite-state iterator over one
//! owned permutation array: every call to [`StepSequence::next_step`] advances
//! the algorithm to its next checkpoint and exposes the array state there.
//! The cadence of checkpoints is part of the contract (it defines the visual
//! pacing of the resulting video) and differs per algorithm; see
//! [`Algorithm`].

mod steps;

use crate::foundation::error::{TilesortError, TilesortResult};

/// The closed set of sorting variants, in index order.
///
/// Checkpoint cadence per variant:
///
/// - `Bubble`: one snapshot per completed outer pass (N total)
/// - `Selection`: one snapshot per placed minimum (N total)
/// - `Insertion`: one snapshot per inserted key (N-1 total)
/// - `Merge`: one snapshot per output element of every merge step
/// - `Quick`: one snapshot per swap into the less-than-pivot region, plus one
///   when the pivot lands in its resting position
/// - `Heap`: one snapshot per sift-down swap and one per root-to-end
///   extraction swap
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
    Heap,
}

impl Algorithm {
    /// All variants, in the order exposed to `--algorithm <index>`.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Merge,
        Algorithm::Quick,
        Algorithm::Heap,
    ];

    /// Resolve a CLI index into a variant.
    ///
    /// Fails before any work happens when the index falls outside the closed
    /// set.
    pub fn from_index(index: usize) -> TilesortResult<Self> {
        Self::ALL.get(index).copied().ok_or_else(|| {
            TilesortError::config(format!(
                "unknown algorithm index {index} (valid indices are 0..{})",
                Self::ALL.len()
            ))
        })
    }

    /// Stable lowercase name, used for the default output file name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Merge => "merge",
            Algorithm::Quick => "quick",
            Algorithm::Heap => "heap",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A lazy, single-pass sequence of permutation snapshots.
///
/// Ordering contract: snapshots come out in algorithm order, one per
/// checkpoint; once `next_step` returns `None` the sequence is exhausted for
/// good. Every exposed state is a bijection on `[0, N)`.
///
/// The borrow returned by `next_step` ends before the next pull, so the
/// producer can keep mutating its single owned array in place between calls.
pub trait StepSequence {
    /// Advance to the next checkpoint and expose the array state there.
    fn next_step(&mut self) -> Option<&[usize]>;
}

/// Owns the permutation array and selects a sorting variant over it.
///
/// The engine introduces no randomness: shuffling the initial array is the
/// caller's job, done once before construction. Same array + same variant
/// produces the identical snapshot sequence every time.
pub struct SortEngine {
    array: Vec<usize>,
}

impl SortEngine {
    /// Take ownership of the initial permutation.
    ///
    /// The array must contain every integer in `[0, len)` exactly once; a
    /// duplicate, missing, or out-of-range value is a validation error. Empty
    /// and single-element arrays are legal.
    pub fn new(array: Vec<usize>) -> TilesortResult<Self> {
        let n = array.len();
        let mut seen = vec![false; n];
        for &v in &array {
            if v >= n || seen[v] {
                return Err(TilesortError::validation(format!(
                    "initial array must be a permutation of 0..{n} (bad value {v})"
                )));
            }
            seen[v] = true;
        }
        Ok(Self { array })
    }

    /// Number of elements in the permutation.
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Whether the permutation is empty.
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Consume the engine into the step sequence for `algorithm`.
    pub fn run(self, algorithm: Algorithm) -> Box<dyn StepSequence> {
        steps::sequence_for(algorithm, self.array)
    }
}
