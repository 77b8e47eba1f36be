/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Pure functions at the heart of the pipeline: rank of a batch, rank →
//! output-line pattern, rank → serial text.
//!
//! Nothing here blocks or touches hardware, so every mapping is a total
//! function that yields the same output for the same input.

use std::fmt;

// ── Domain types ──────────────────────────────────────────────────────────────

/// Number of samples in one batch.  Also the capacity of the sample queue.
pub const BATCH_SIZE: usize = 6;

/// Capacity of the rank queue: only the latest unread rank is kept.
pub const RANK_QUEUE_CAPACITY: usize = 1;

/// Default exclusive upper bound of sample values.
pub const DEFAULT_UPPER_BOUND: u32 = 10_000;

/// One random value in `[0, upper_bound)`.
pub type Sample = u32;

/// One production cycle's worth of samples, in enqueue order.
pub type Batch = [Sample; BATCH_SIZE];

/// Count of batch elements `<=` the batch's first element.  Always in
/// `1..=BATCH_SIZE`.
pub type Rank = usize;

/// Number of reporter-owned output lines (L0, L1, L2).
pub const RANK_LINE_COUNT: usize = 3;

// ── Rank computation ──────────────────────────────────────────────────────────

/// Rank of `batch[0]` within its own batch.
///
/// Counts every element `<= batch[0]`, the first element included, so the
/// result is at least 1.  No state is carried between batches.
pub fn compute_rank(batch: &Batch) -> Rank {
    let target = batch[0];
    batch.iter().filter(|&&v| v <= target).count()
}

// ── Output pattern ────────────────────────────────────────────────────────────

/// Set of asserted reporter lines, bit `i` = line `Li`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinePattern(u8);

impl LinePattern {
    pub const NONE: LinePattern = LinePattern(0);
    pub const L0: LinePattern = LinePattern(0b001);
    pub const L1: LinePattern = LinePattern(0b010);
    pub const L2: LinePattern = LinePattern(0b100);

    /// Union of two patterns.
    pub const fn with(self, other: LinePattern) -> LinePattern {
        LinePattern(self.0 | other.0)
    }

    /// Whether line `Li` is asserted.
    pub fn is_set(self, line: usize) -> bool {
        line < RANK_LINE_COUNT && (self.0 >> line) & 1 == 1
    }

    /// Asserted state of L0, L1, L2 in order.
    pub fn levels(self) -> [bool; RANK_LINE_COUNT] {
        [self.is_set(0), self.is_set(1), self.is_set(2)]
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for LinePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<String> = (0..RANK_LINE_COUNT)
            .filter(|&i| self.is_set(i))
            .map(|i| format!("L{i}"))
            .collect();
        write!(f, "{}", names.join("+"))
    }
}

/// Patterns for ranks 1..=5; index is `rank - 1`.
const RANK_PATTERNS: [LinePattern; 5] = [
    LinePattern::L0,
    LinePattern::L1,
    LinePattern::L0.with(LinePattern::L1),
    LinePattern::L2,
    LinePattern::L0.with(LinePattern::L2),
];

/// Lines to assert for `rank`.  Rank 6 and anything outside the table map
/// to [`LinePattern::NONE`] (reported as text only).
pub fn pattern_for_rank(rank: Rank) -> LinePattern {
    rank.checked_sub(1)
        .and_then(|i| RANK_PATTERNS.get(i))
        .copied()
        .unwrap_or(LinePattern::NONE)
}

// ── Serial text ───────────────────────────────────────────────────────────────

/// Line sent over the serial channel for one rank event.
pub fn report_line(rank: Rank) -> String {
    format!("Rank = {rank}\r\n")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn rank_counts_elements_at_or_below_first() {
        // {5000, 100, 5000, 1} are <= 5000
        assert_eq!(compute_rank(&[5000, 100, 9000, 5000, 1, 7000]), 4);
    }

    #[test]
    fn ascending_batch_ranks_first() {
        assert_eq!(compute_rank(&[1, 2, 3, 4, 5, 6]), 1);
    }

    #[test]
    fn all_equal_batch_ranks_full() {
        assert_eq!(compute_rank(&[9, 9, 9, 9, 9, 9]), 6);
    }

    #[test]
    fn descending_batch_ranks_full() {
        assert_eq!(compute_rank(&[9999, 5, 4, 3, 2, 0]), 6);
    }

    #[test]
    fn rank_stays_within_bounds_for_many_batches() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let batch: Batch = std::array::from_fn(|_| rng.gen_range(0..DEFAULT_UPPER_BOUND));
            let rank = compute_rank(&batch);
            assert!((1..=BATCH_SIZE).contains(&rank));
            let expected = batch.iter().filter(|&&v| v <= batch[0]).count();
            assert_eq!(rank, expected);
        }
    }

    #[test]
    fn pattern_table_matches_line_assignments() {
        assert_eq!(pattern_for_rank(1).levels(), [true, false, false]);
        assert_eq!(pattern_for_rank(2).levels(), [false, true, false]);
        assert_eq!(pattern_for_rank(3).levels(), [true, true, false]);
        assert_eq!(pattern_for_rank(4).levels(), [false, false, true]);
        assert_eq!(pattern_for_rank(5).levels(), [true, false, true]);
    }

    #[test]
    fn unmapped_ranks_assert_nothing() {
        for rank in [0, 6, 7, usize::MAX] {
            assert_eq!(pattern_for_rank(rank), LinePattern::NONE, "rank {rank}");
        }
    }

    #[test]
    fn mapping_is_idempotent() {
        for rank in 0..=8 {
            assert_eq!(pattern_for_rank(rank), pattern_for_rank(rank));
            assert_eq!(report_line(rank), report_line(rank));
        }
    }

    #[test]
    fn report_line_format() {
        assert_eq!(report_line(4), "Rank = 4\r\n");
        assert_eq!(report_line(6), "Rank = 6\r\n");
    }

    #[test]
    fn pattern_display_lists_lines() {
        assert_eq!(pattern_for_rank(5).to_string(), "L0+L2");
        assert_eq!(pattern_for_rank(6).to_string(), "none");
    }
}
