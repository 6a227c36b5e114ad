//! Explicit state machines for the six sorting variants.
//!
//! None of these use language-level suspension: each struct carries the
//! algorithm's progress cursor alongside the single owned array, and
//! `next_step` runs the algorithm forward until the next checkpoint. The
//! recursive algorithms (merge, quick) replace nested recursion with an
//! explicit work stack; depth-first, left-before-right visiting order is part
//! of the contract and must not be reordered.

use super::{Algorithm, StepSequence};

pub(super) fn sequence_for(algorithm: Algorithm, array: Vec<usize>) -> Box<dyn StepSequence> {
    match algorithm {
        Algorithm::Bubble => Box::new(BubbleSteps::new(array)),
        Algorithm::Selection => Box::new(SelectionSteps::new(array)),
        Algorithm::Insertion => Box::new(InsertionSteps::new(array)),
        Algorithm::Merge => Box::new(MergeSteps::new(array)),
        Algorithm::Quick => Box::new(QuickSteps::new(array)),
        Algorithm::Heap => Box::new(HeapSteps::new(array)),
    }
}

/// Bubble sort: N outer passes, one snapshot per completed pass.
///
/// Every pass runs the full adjacent compare/swap sweep even when nothing
/// moves any more, so the sequence always has exactly N snapshots.
struct BubbleSteps {
    arr: Vec<usize>,
    pass: usize,
}

impl BubbleSteps {
    fn new(arr: Vec<usize>) -> Self {
        Self { arr, pass: 0 }
    }
}

impl StepSequence for BubbleSteps {
    fn next_step(&mut self) -> Option<&[usize]> {
        if self.pass >= self.arr.len() {
            return None;
        }
        for j in 1..self.arr.len() {
            if self.arr[j - 1] > self.arr[j] {
                self.arr.swap(j - 1, j);
            }
        }
        self.pass += 1;
        Some(&self.arr)
    }
}

/// Selection sort: one snapshot per placed minimum, N total.
///
/// The swap may be a self-swap when the minimum is already in place; the
/// snapshot is emitted regardless.
struct SelectionSteps {
    arr: Vec<usize>,
    i: usize,
}

impl SelectionSteps {
    fn new(arr: Vec<usize>) -> Self {
        Self { arr, i: 0 }
    }
}

impl StepSequence for SelectionSteps {
    fn next_step(&mut self) -> Option<&[usize]> {
        if self.i >= self.arr.len() {
            return None;
        }
        let mut min = self.i;
        for j in self.i + 1..self.arr.len() {
            if self.arr[j] < self.arr[min] {
                min = j;
            }
        }
        self.arr.swap(self.i, min);
        self.i += 1;
        Some(&self.arr)
    }
}

/// Insertion sort: one snapshot per outer iteration (not per inner shift),
/// N-1 total.
struct InsertionSteps {
    arr: Vec<usize>,
    i: usize,
}

impl InsertionSteps {
    fn new(arr: Vec<usize>) -> Self {
        Self { arr, i: 1 }
    }
}

impl StepSequence for InsertionSteps {
    fn next_step(&mut self) -> Option<&[usize]> {
        if self.i >= self.arr.len() {
            return None;
        }
        let mut j = self.i;
        while j > 0 && self.arr[j - 1] > self.arr[j] {
            self.arr.swap(j - 1, j);
            j -= 1;
        }
        self.i += 1;
        Some(&self.arr)
    }
}

/// One pending unit of merge-sort work. `Split` expands into its halves plus
/// a trailing `Merge`; the stack pops left halves first, matching the
/// recursive depth-first order.
enum MergeTask {
    Split { lo: usize, hi: usize },
    Merge { lo: usize, mid: usize, hi: usize },
}

/// An in-progress merge of `[i, j)` (left run) with `[j, hi)` (right run).
#[derive(Clone, Copy)]
struct MergeRun {
    i: usize,
    j: usize,
    hi: usize,
    remaining: usize,
}

/// Top-down merge sort: one snapshot per output element of every merge.
///
/// The merge works in place: taking the right-run head rotates it into
/// position instead of copying through an auxiliary buffer, so every
/// intermediate state the sequence exposes is still a permutation. Ties keep
/// the left run's element first. Each merge of a range of length L emits
/// exactly L snapshots, including the trailing positions whose elements were
/// already in place.
struct MergeSteps {
    arr: Vec<usize>,
    stack: Vec<MergeTask>,
    run: Option<MergeRun>,
}

impl MergeSteps {
    fn new(arr: Vec<usize>) -> Self {
        let stack = vec![MergeTask::Split {
            lo: 0,
            hi: arr.len(),
        }];
        Self {
            arr,
            stack,
            run: None,
        }
    }
}

impl StepSequence for MergeSteps {
    fn next_step(&mut self) -> Option<&[usize]> {
        loop {
            if let Some(mut run) = self.run.take() {
                if run.i < run.j && run.j < run.hi {
                    if self.arr[run.i] <= self.arr[run.j] {
                        // Left head is already the next output element.
                    } else {
                        self.arr[run.i..=run.j].rotate_right(1);
                        run.j += 1;
                    }
                }
                run.i += 1;
                run.remaining -= 1;
                if run.remaining > 0 {
                    self.run = Some(run);
                }
                return Some(&self.arr);
            }

            match self.stack.pop()? {
                MergeTask::Split { lo, hi } => {
                    if hi - lo <= 1 {
                        continue;
                    }
                    let mid = lo + (hi - lo) / 2;
                    self.stack.push(MergeTask::Merge { lo, mid, hi });
                    self.stack.push(MergeTask::Split { lo: mid, hi });
                    self.stack.push(MergeTask::Split { lo, hi: mid });
                }
                MergeTask::Merge { lo, mid, hi } => {
                    self.run = Some(MergeRun {
                        i: lo,
                        j: mid,
                        hi,
                        remaining: hi - lo,
                    });
                }
            }
        }
    }
}

/// An in-progress Lomuto partition of `[lo, hi)` with the pivot at `hi - 1`.
/// `i` is the boundary of the less-than region, `j` the scan cursor.
#[derive(Clone, Copy)]
struct Partition {
    lo: usize,
    hi: usize,
    i: usize,
    j: usize,
}

/// Quicksort with Lomuto partitioning on the last element.
///
/// A snapshot is emitted for every swap into the less-than region (self-swaps
/// included) and once more when the pivot lands in its resting position. The
/// left sub-range is always processed before the right one.
struct QuickSteps {
    arr: Vec<usize>,
    stack: Vec<(usize, usize)>,
    part: Option<Partition>,
}

impl QuickSteps {
    fn new(arr: Vec<usize>) -> Self {
        let stack = vec![(0, arr.len())];
        Self {
            arr,
            stack,
            part: None,
        }
    }
}

impl StepSequence for QuickSteps {
    fn next_step(&mut self) -> Option<&[usize]> {
        loop {
            if let Some(mut p) = self.part.take() {
                let pivot = self.arr[p.hi - 1];
                while p.j + 1 < p.hi {
                    if self.arr[p.j] < pivot {
                        self.arr.swap(p.i, p.j);
                        p.i += 1;
                        p.j += 1;
                        self.part = Some(p);
                        return Some(&self.arr);
                    }
                    p.j += 1;
                }
                // Scan complete: pivot moves to its resting position, then the
                // sub-ranges go on the stack, right below left.
                let pivot_at = p.i;
                self.arr.swap(pivot_at, p.hi - 1);
                self.stack.push((pivot_at + 1, p.hi));
                self.stack.push((p.lo, pivot_at));
                return Some(&self.arr);
            }

            let (lo, hi) = self.stack.pop()?;
            if hi - lo < 2 {
                continue;
            }
            self.part = Some(Partition { lo, hi, i: lo, j: lo });
        }
    }
}

enum HeapPhase {
    Build { i: usize },
    Extract { end: usize },
    Done,
}

/// Heapsort: bottom-up max-heap build, then repeated root extraction.
///
/// A snapshot is emitted each time sift-down performs a swap (during both the
/// build and every re-heapify) and once per root-to-end swap. Sift-down only
/// descends into the child it actually swapped with.
struct HeapSteps {
    arr: Vec<usize>,
    phase: HeapPhase,
    /// In-progress sift-down as (node, heap end).
    sift: Option<(usize, usize)>,
}

impl HeapSteps {
    fn new(arr: Vec<usize>) -> Self {
        let phase = HeapPhase::Build { i: arr.len() / 2 };
        Self {
            arr,
            phase,
            sift: None,
        }
    }
}

impl StepSequence for HeapSteps {
    fn next_step(&mut self) -> Option<&[usize]> {
        loop {
            if let Some((node, end)) = self.sift {
                let left = 2 * node + 1;
                let right = left + 1;
                let mut largest = node;
                if left < end && self.arr[left] > self.arr[largest] {
                    largest = left;
                }
                if right < end && self.arr[right] > self.arr[largest] {
                    largest = right;
                }
                if largest == node {
                    self.sift = None;
                    continue;
                }
                self.arr.swap(node, largest);
                self.sift = Some((largest, end));
                return Some(&self.arr);
            }

            match self.phase {
                HeapPhase::Build { i } => {
                    if i == 0 {
                        self.phase = HeapPhase::Extract {
                            end: self.arr.len(),
                        };
                    } else {
                        self.phase = HeapPhase::Build { i: i - 1 };
                        self.sift = Some((i - 1, self.arr.len()));
                    }
                }
                HeapPhase::Extract { end } => {
                    if end <= 1 {
                        self.phase = HeapPhase::Done;
                        continue;
                    }
                    let last = end - 1;
                    self.arr.swap(0, last);
                    self.phase = HeapPhase::Extract { end: last };
                    self.sift = Some((0, last));
                    return Some(&self.arr);
                }
                HeapPhase::Done => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(algorithm: Algorithm, arr: Vec<usize>) -> Vec<Vec<usize>> {
        let mut steps = sequence_for(algorithm, arr);
        let mut out = Vec::new();
        while let Some(snap) = steps.next_step() {
            out.push(snap.to_vec());
        }
        out
    }

    #[test]
    fn bubble_emits_one_snapshot_per_pass() {
        let snaps = collect(Algorithm::Bubble, vec![3, 2, 1, 0]);
        assert_eq!(snaps.len(), 4);
        // One full pass over [3,2,1,0] bubbles 3 to the end.
        assert_eq!(snaps[0], vec![2, 1, 0, 3]);
        assert_eq!(snaps[3], vec![0, 1, 2, 3]);
    }

    #[test]
    fn bubble_emits_passes_even_when_sorted() {
        let snaps = collect(Algorithm::Bubble, vec![0, 1, 2]);
        assert_eq!(snaps, vec![vec![0, 1, 2]; 3]);
    }

    #[test]
    fn selection_places_one_minimum_per_step() {
        let snaps = collect(Algorithm::Selection, vec![2, 0, 1]);
        assert_eq!(
            snaps,
            vec![vec![0, 2, 1], vec![0, 1, 2], vec![0, 1, 2]],
        );
    }

    #[test]
    fn insertion_emits_per_key_not_per_shift() {
        let snaps = collect(Algorithm::Insertion, vec![3, 2, 1, 0]);
        assert_eq!(snaps.len(), 3);
        assert_eq!(snaps[0], vec![2, 3, 1, 0]);
        assert_eq!(snaps[1], vec![1, 2, 3, 0]);
        assert_eq!(snaps[2], vec![0, 1, 2, 3]);
    }

    #[test]
    fn merge_emits_one_snapshot_per_merged_element() {
        // n = 4 merges ranges of length 2, 2 and 4.
        let snaps = collect(Algorithm::Merge, vec![3, 1, 2, 0]);
        assert_eq!(snaps.len(), 8);
        assert_eq!(snaps[7], vec![0, 1, 2, 3]);
    }

    #[test]
    fn merge_snapshots_stay_permutations() {
        for snap in collect(Algorithm::Merge, vec![5, 3, 1, 4, 0, 2]) {
            let mut sorted = snap.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5]);
        }
    }

    #[test]
    fn quick_partitions_left_before_right() {
        // Pivot 2 partitions [3,0,1,2] into [0,1] | 2 | [3].
        let snaps = collect(Algorithm::Quick, vec![3, 0, 1, 2]);
        // Two less-than swaps, pivot swap, then the left range's pivot swap.
        assert_eq!(snaps[0], vec![0, 3, 1, 2]);
        assert_eq!(snaps[1], vec![0, 1, 3, 2]);
        assert_eq!(snaps[2], vec![0, 1, 2, 3]);
        assert_eq!(*snaps.last().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn heap_sorts_and_emits_only_on_swaps() {
        let snaps = collect(Algorithm::Heap, vec![0, 1, 2, 3]);
        assert!(!snaps.is_empty());
        assert_eq!(*snaps.last().unwrap(), vec![0, 1, 2, 3]);
        // Consecutive snapshots always differ by at least one swap during the
        // heap phases, except trailing re-heapifies that happen to restore a
        // prior state; at minimum the first snapshot differs from the input.
        assert_ne!(snaps[0], vec![0, 1, 2, 3]);
    }

    #[test]
    fn degenerate_lengths_yield_trivial_sequences() {
        for alg in Algorithm::ALL {
            assert!(collect(alg, vec![]).is_empty(), "{alg} on empty input");
        }
        assert_eq!(collect(Algorithm::Bubble, vec![0]).len(), 1);
        assert_eq!(collect(Algorithm::Selection, vec![0]).len(), 1);
        assert!(collect(Algorithm::Insertion, vec![0]).is_empty());
        assert!(collect(Algorithm::Merge, vec![0]).is_empty());
        assert!(collect(Algorithm::Quick, vec![0]).is_empty());
        assert!(collect(Algorithm::Heap, vec![0]).is_empty());
    }
}
