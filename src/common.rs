// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module defines the most basic data types that are used both in the
//! abstraction and implementation layers of this crate. These are also the
//! types a caller is likely to work with directly.
use std::hash::{Hash, Hasher};

use metrohash::MetroHash64;
use serde::{Deserialize, Serialize};

use crate::error::CutStockError;

/// A total order over how eagerly a piece length should be satisfied. This is
/// a pure tiebreaker (see the component design): it never changes whether a
/// plan is feasible, only which of two equally-scored plans wins.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
}

impl Default for Priority {
    fn default() -> Priority {
        Priority::Normal
    }
}

/// One line of canonical (post-normalization) demand: a piece length, the
/// quantity still required, and the priority carried over from the input
/// (the maximum priority, if duplicate lengths were merged).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DemandItem {
    pub length: u64,
    pub quantity: u64,
    pub priority: Priority,
}

/// The canonical form of a demand list: lengths are unique and sorted
/// descending. Every downstream component consumes this type rather than the
/// caller's raw, possibly-duplicated demand list.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedDemand {
    items: Vec<DemandItem>,
}

impl NormalizedDemand {
    /// Wraps an already-sorted, already-deduplicated vector of demand items.
    /// Only `implementation::normalizer` should call this directly.
    pub(crate) fn from_sorted(items: Vec<DemandItem>) -> NormalizedDemand {
        debug_assert!(items.windows(2).all(|w| w[0].length > w[1].length));
        NormalizedDemand { items }
    }

    pub fn items(&self) -> &[DemandItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// The longest demanded piece length, used to size the knapsack DP table
    /// and to validate a candidate master roll length during a range sweep.
    pub fn max_length(&self) -> u64 {
        self.items.iter().map(|i| i.length).max().unwrap_or(0)
    }

    /// `Σᵢ qᵢ·ℓᵢ`, the total length of material actually demanded.
    pub fn total_demanded_length(&self) -> u64 {
        self.items.iter().map(|i| i.length * i.quantity).sum()
    }

    /// `Σᵢ qᵢ`, the total piece count across all lengths.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn quantity_of(&self, length: u64) -> u64 {
        self.items
            .iter()
            .find(|i| i.length == length)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }
}

/// An immutable multiset of pieces that fits within one stock roll of length
/// `master_length`. Two patterns are equal iff their canonicalizations (piece
/// counts sorted by descending length) are equal; construction enforces that
/// canonical form so equality and hashing never have to re-sort.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    master_length: u64,
    /// Sorted descending by length, no two entries share a length, every
    /// count is strictly positive.
    cuts: Vec<(u64, u64)>,
    total_length: u64,
}

impl Pattern {
    /// Builds a pattern from a (length, count) multiset. Duplicate lengths
    /// are summed, zero counts dropped, the result sorted descending by
    /// length. Fails with `InvalidInput` if the pattern does not fit in one
    /// roll of `master_length`.
    pub fn from_counts(
        counts: impl IntoIterator<Item = (u64, u64)>,
        master_length: u64,
    ) -> Result<Pattern, CutStockError> {
        let mut merged: Vec<(u64, u64)> = Vec::new();
        for (length, count) in counts {
            if count == 0 {
                continue;
            }
            match merged.iter_mut().find(|(l, _)| *l == length) {
                Some((_, c)) => *c += count,
                None => merged.push((length, count)),
            }
        }
        merged.sort_unstable_by(|a, b| b.0.cmp(&a.0));

        let total_length: u64 = merged.iter().map(|(l, c)| l * c).sum();
        if total_length > master_length {
            return Err(CutStockError::InvalidInput(format!(
                "pattern of total length {} does not fit in a roll of length {}",
                total_length, master_length
            )));
        }

        Ok(Pattern {
            master_length,
            cuts: merged,
            total_length,
        })
    }

    /// The empty pattern: zero pieces, all waste. Used as a placeholder when
    /// opening a fresh roll in the greedy heuristics.
    pub fn empty(master_length: u64) -> Pattern {
        Pattern {
            master_length,
            cuts: Vec::new(),
            total_length: 0,
        }
    }

    pub fn cuts(&self) -> &[(u64, u64)] {
        &self.cuts
    }

    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    pub fn waste(&self) -> u64 {
        self.master_length - self.total_length
    }

    pub fn count_of(&self, length: u64) -> u64 {
        self.cuts
            .iter()
            .find(|(l, _)| *l == length)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    pub fn remaining_capacity(&self) -> u64 {
        self.waste()
    }

    /// A deterministic, content-addressed identifier: a `MetroHash64` digest
    /// of the canonical (length, count) pairs, rendered in decimal. Stable
    /// across runs and processes, unlike an id derived from a memory address.
    pub fn id(&self) -> String {
        let mut hasher = MetroHash64::new();
        for (length, count) in &self.cuts {
            length.hash(&mut hasher);
            count.hash(&mut hasher);
        }
        format!("{}", hasher.finish())
    }

    /// Returns a copy of this pattern with one more piece of `length` added,
    /// or `None` if it would not fit. Used by the greedy heuristics to grow a
    /// roll in place.
    pub fn with_piece_added(&self, length: u64) -> Option<Pattern> {
        if length > self.remaining_capacity() {
            return None;
        }
        let mut counts = self.cuts.clone();
        match counts.iter_mut().find(|(l, _)| *l == length) {
            Some((_, c)) => *c += 1,
            None => counts.push((length, 1)),
        }
        Pattern::from_counts(counts, self.master_length).ok()
    }

    /// A human-readable canonical rendering: `"c1×l1 + c2×l2 + … (waste w)"`.
    pub fn describe(&self) -> String {
        let body = self
            .cuts
            .iter()
            .map(|(l, c)| format!("{}×{}", c, l))
            .collect::<Vec<_>>()
            .join(" + ");
        format!("{} (waste {})", body, self.waste())
    }
}

/// How many times a given pattern is cut, as part of a cutting plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternUsage {
    pub pattern: Pattern,
    pub rolls_used: u64,
}

/// Coarse quality tag attached to every report. `Optimal` and `NearOptimal`
/// both come from a correctly terminated column-generation loop (the
/// difference is whether the LP relaxation was proven tight or only
/// empirically so); `Timeout` and `Error` mean a resource guard fired.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convergence {
    Optimal,
    NearOptimal,
    Timeout,
    Error,
}

/// Status of one entry in the algorithm-step trace.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

/// One entry of the append-only trace recorded during a solve. `duration_s`
/// is only meaningful once `status` is `Completed` or `Error`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmStep {
    pub step: usize,
    pub name: String,
    pub status: StepStatus,
    pub duration_s: f64,
    pub detail: String,
}

/// Best-effort performance counters returned alongside every report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceCounters {
    pub execution_time_s: f64,
    /// Peak resident memory in bytes, or 0 when unavailable (this crate has
    /// no portable peak-RSS probe in its dependency stack and always reports
    /// 0 — see DESIGN.md).
    pub memory_peak_bytes: u64,
    pub patterns_evaluated: usize,
    pub iterations: usize,
    pub convergence: Convergence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_from_counts_merges_duplicate_lengths_and_sorts_descending() {
        let pattern = Pattern::from_counts(vec![(30, 1), (60, 1), (30, 1)], 200).unwrap();
        assert_eq!(pattern.cuts(), &[(60, 1), (30, 2)]);
        assert_eq!(pattern.total_length(), 120);
        assert_eq!(pattern.waste(), 80);
    }

    #[test]
    fn pattern_from_counts_rejects_patterns_that_overflow_the_roll() {
        let err = Pattern::from_counts(vec![(60, 1), (50, 1)], 100);
        assert!(err.is_err());
    }

    #[test]
    fn pattern_waste_is_master_length_minus_total() {
        let pattern = Pattern::from_counts(vec![(50, 2)], 100).unwrap();
        assert_eq!(pattern.total_length(), 100);
        assert_eq!(pattern.waste(), 0);
    }

    #[test]
    fn pattern_id_is_deterministic_and_order_independent() {
        let a = Pattern::from_counts(vec![(30, 2), (60, 1)], 100).unwrap();
        let b = Pattern::from_counts(vec![(60, 1), (30, 1), (30, 1)], 100).unwrap();
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn pattern_id_differs_for_different_patterns() {
        let a = Pattern::from_counts(vec![(30, 2)], 100).unwrap();
        let b = Pattern::from_counts(vec![(30, 3)], 100).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn with_piece_added_respects_capacity() {
        let pattern = Pattern::from_counts(vec![(60, 1)], 100).unwrap();
        assert!(pattern.with_piece_added(50).is_none());
        let grown = pattern.with_piece_added(40).unwrap();
        assert_eq!(grown.total_length(), 100);
    }
}
