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

//! C3: the column generator's pricing subproblem. Given one dual price per
//! normalized piece length, finds the pattern of largest reduced cost by
//! solving a bounded integer knapsack: `max Σ dᵢ·xᵢ s.t. Σ ℓᵢ·xᵢ ≤ L, 0 ≤ xᵢ ≤ qᵢ`.
//!
//! The primary path is a dense 1-D dynamic program over capacities `0..=L`,
//! using the standard "decompose into powers of two" trick to turn each
//! bounded item into `O(log qᵢ)` 0/1 items. When `L` would blow the DP cell
//! budget, `price_branch_and_bound` takes over; both paths honor the same
//! tie-break and determinism rules.
use std::cmp::Ordering;
use std::time::Instant;

use binary_heap_plus::BinaryHeap;
use compare::Compare;

use crate::cancellation::CancellationToken;
use crate::error::CutStockError;
use crate::limits::SolverLimits;

/// One item of the pricing subproblem: a normalized piece length, its dual
/// price, and the residual quantity still demanded (the upper bound on xᵢ).
#[derive(Clone, Copy, Debug)]
pub struct PricedItem {
    pub length: u64,
    pub dual: f64,
    pub max_count: u64,
}

/// The winning column of a pricing round: the objective value `Z*` and the
/// multiplicity of each item in `PricedItem` order.
#[derive(Clone, Debug, PartialEq)]
pub struct KnapsackSolution {
    pub objective: f64,
    pub counts: Vec<u64>,
}

/// A composite comparison key implementing the tie-break rule of the
/// component design: larger objective first, then larger `Σxᵢ`, then larger
/// `Σℓᵢxᵢ`. Using this key (instead of bare `f64` objective) throughout the
/// DP update makes the winning column deterministic rather than an artifact
/// of traversal order.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Key {
    value: f64,
    count_sum: u64,
    length_sum: u64,
}

impl Key {
    const ZERO: Key = Key {
        value: 0.0,
        count_sum: 0,
        length_sum: 0,
    };

    fn better_than(&self, other: &Key) -> bool {
        if (self.value - other.value).abs() > 1e-9 {
            return self.value > other.value;
        }
        if self.count_sum != other.count_sum {
            return self.count_sum > other.count_sum;
        }
        self.length_sum > other.length_sum
    }
}

/// Solves the pricing subproblem for `items` against a roll of `capacity`,
/// choosing the dense DP or the branch-and-bound fallback based on
/// `limits.max_dp_cells`.
pub fn price(
    items: &[PricedItem],
    capacity: u64,
    limits: &SolverLimits,
    deadline: Option<Instant>,
    cancellation: &CancellationToken,
) -> Result<KnapsackSolution, CutStockError> {
    if capacity as usize + 1 > limits.max_dp_cells {
        return price_branch_and_bound(items, capacity, limits, cancellation);
    }
    price_dynamic_programming(items, capacity, deadline, cancellation)
}

/// Splits a bounded quantity `q` into `O(log q)` chunk sizes (1, 2, 4, ...,
/// remainder) so a bounded knapsack item can be treated as that many 0/1
/// items without losing any attainable multiplicity.
fn binary_chunks(q: u64) -> Vec<u64> {
    let mut chunks = Vec::new();
    let mut remaining = q;
    let mut chunk = 1u64;
    while remaining > 0 {
        let take = chunk.min(remaining);
        chunks.push(take);
        remaining -= take;
        chunk = chunk.saturating_mul(2);
    }
    chunks
}

struct VirtualItem {
    original_index: usize,
    length: u64,
    value: f64,
    count: u64,
}

fn price_dynamic_programming(
    items: &[PricedItem],
    capacity: u64,
    deadline: Option<Instant>,
    cancellation: &CancellationToken,
) -> Result<KnapsackSolution, CutStockError> {
    let cap = capacity as usize;
    let mut virtual_items = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        if item.max_count == 0 || item.length > capacity {
            continue;
        }
        for chunk in binary_chunks(item.max_count) {
            virtual_items.push(VirtualItem {
                original_index: idx,
                length: chunk * item.length,
                value: chunk as f64 * item.dual,
                count: chunk,
            });
        }
    }

    let mut dp = vec![Key::ZERO; cap + 1];
    // `take[v][c]`: was virtual item `v` used to reach `dp[c]` at the moment
    // it was considered? Needed to reconstruct `x` after the forward pass.
    let mut take: Vec<Vec<bool>> = vec![vec![false; cap + 1]; virtual_items.len()];

    for (v_idx, v) in virtual_items.iter().enumerate() {
        if v_idx % 64 == 0 {
            if cancellation.is_cancelled() {
                return Err(CutStockError::Cancelled);
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    break;
                }
            }
        }
        let vlen = v.length as usize;
        if vlen > cap {
            continue;
        }
        for c in (vlen..=cap).rev() {
            let candidate = Key {
                value: dp[c - vlen].value + v.value,
                count_sum: dp[c - vlen].count_sum + v.count,
                length_sum: dp[c - vlen].length_sum + v.length,
            };
            if candidate.better_than(&dp[c]) {
                dp[c] = candidate;
                take[v_idx][c] = true;
            }
        }
    }

    let mut best_c = 0usize;
    for c in 1..=cap {
        if dp[c].better_than(&dp[best_c]) {
            best_c = c;
        }
    }

    let mut counts = vec![0u64; items.len()];
    let mut c = best_c;
    for v_idx in (0..virtual_items.len()).rev() {
        if take[v_idx][c] {
            let v = &virtual_items[v_idx];
            counts[v.original_index] += v.count;
            c -= v.length as usize;
        }
    }

    Ok(KnapsackSolution {
        objective: dp[best_c].value,
        counts,
    })
}

/// A partial assignment explored by the branch-and-bound fallback. `bound`
/// is the fractional-relaxation upper bound on any completion of this node;
/// `seq` breaks ties on bound by insertion order so the search order (and
/// hence the winning column, among equally-bound nodes) is reproducible.
struct Node {
    next_index: usize,
    value: f64,
    length: u64,
    count_sum: u64,
    counts: Vec<u64>,
    bound: f64,
    seq: u64,
}

struct NodeOrder;
impl Compare<Node> for NodeOrder {
    fn compare(&self, a: &Node, b: &Node) -> Ordering {
        a.bound
            .partial_cmp(&b.bound)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.seq.cmp(&a.seq))
    }
}

/// Upper bound on the best completion of a node: the value already taken
/// plus the classic fractional-knapsack bound on the remaining capacity
/// using the best (dual / length) ratio among the undecided items.
fn completion_bound(node: &Node, items: &[PricedItem], capacity: u64) -> f64 {
    let remaining_capacity = capacity.saturating_sub(node.length);
    let best_ratio = items[node.next_index..]
        .iter()
        .filter(|it| it.length > 0)
        .map(|it| it.dual / it.length as f64)
        .fold(0.0_f64, f64::max);
    node.value + remaining_capacity as f64 * best_ratio
}

fn price_branch_and_bound(
    items: &[PricedItem],
    capacity: u64,
    limits: &SolverLimits,
    cancellation: &CancellationToken,
) -> Result<KnapsackSolution, CutStockError> {
    let mut seq_counter = 0u64;
    let mut next_seq = || {
        seq_counter += 1;
        seq_counter
    };

    let root = Node {
        next_index: 0,
        value: 0.0,
        length: 0,
        count_sum: 0,
        counts: vec![0; items.len()],
        bound: 0.0,
        seq: next_seq(),
    };
    let root_bound = completion_bound(&root, items, capacity);
    let mut fringe = BinaryHeap::from_vec_cmp(vec![Node { bound: root_bound, ..root }], NodeOrder);

    let mut best = Key::ZERO;
    let mut best_counts = vec![0u64; items.len()];
    let mut explored = 0usize;

    while let Some(node) = fringe.pop() {
        explored += 1;
        if explored > limits.max_bb_nodes {
            return Err(CutStockError::ResourceExceeded(format!(
                "branch-and-bound knapsack pricer exceeded {} explored nodes",
                limits.max_bb_nodes
            )));
        }
        if cancellation.is_cancelled() {
            return Err(CutStockError::Cancelled);
        }

        let node_key = Key {
            value: node.value,
            count_sum: node.count_sum,
            length_sum: node.length,
        };
        if node_key.better_than(&best) {
            best = node_key;
            best_counts = node.counts.clone();
        }

        if node.bound <= best.value + 1e-9 || node.next_index >= items.len() {
            continue;
        }

        let item = items[node.next_index];
        let remaining_capacity = capacity.saturating_sub(node.length);
        let max_take = if item.length == 0 {
            0
        } else {
            item.max_count.min(remaining_capacity / item.length)
        };

        // Branch on every feasible multiplicity of the next item, largest
        // first so the best-first order tends to find good incumbents early.
        for take in (0..=max_take).rev() {
            let mut counts = node.counts.clone();
            counts[node.next_index] = take;
            let child = Node {
                next_index: node.next_index + 1,
                value: node.value + take as f64 * item.dual,
                length: node.length + take * item.length,
                count_sum: node.count_sum + take,
                counts,
                bound: 0.0,
                seq: next_seq(),
            };
            let bound = completion_bound(&child, items, capacity);
            if bound > best.value + 1e-9 {
                fringe.push(Node { bound, ..child });
            }
        }
    }

    Ok(KnapsackSolution {
        objective: best.value,
        counts: best_counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> SolverLimits {
        SolverLimits::default()
    }

    #[test]
    fn picks_the_single_best_item_when_only_one_fits() {
        let items = [
            PricedItem { length: 60, dual: 0.5, max_count: 1 },
            PricedItem { length: 50, dual: 0.4, max_count: 1 },
        ];
        let solution = price(&items, 100, &limits(), None, &CancellationToken::new()).unwrap();
        assert_eq!(solution.counts, vec![1, 1]);
        assert!((solution.objective - 0.9).abs() < 1e-9);
    }

    #[test]
    fn respects_the_max_count_bound() {
        let items = [PricedItem { length: 10, dual: 1.0, max_count: 3 }];
        let solution = price(&items, 1000, &limits(), None, &CancellationToken::new()).unwrap();
        assert_eq!(solution.counts, vec![3]);
    }

    #[test]
    fn dp_and_branch_and_bound_agree_on_a_small_instance() {
        let items = [
            PricedItem { length: 7, dual: 3.0, max_count: 5 },
            PricedItem { length: 4, dual: 2.0, max_count: 5 },
            PricedItem { length: 3, dual: 1.4, max_count: 5 },
        ];
        let via_dp = price_dynamic_programming(&items, 20, None, &CancellationToken::new()).unwrap();
        let via_bb = price_branch_and_bound(&items, 20, &limits(), &CancellationToken::new()).unwrap();
        assert!((via_dp.objective - via_bb.objective).abs() < 1e-6);
    }

    #[test]
    fn solution_never_exceeds_capacity() {
        let items = [
            PricedItem { length: 7, dual: 3.0, max_count: 5 },
            PricedItem { length: 4, dual: 2.0, max_count: 5 },
        ];
        let solution = price(&items, 20, &limits(), None, &CancellationToken::new()).unwrap();
        let used: u64 = items
            .iter()
            .zip(solution.counts.iter())
            .map(|(it, c)| it.length * c)
            .sum();
        assert!(used <= 20);
    }

    #[test]
    fn falls_back_to_branch_and_bound_past_the_dp_cell_budget() {
        let mut tight = limits();
        tight.max_dp_cells = 4;
        let items = [PricedItem { length: 3, dual: 1.0, max_count: 2 }];
        let solution = price(&items, 10, &tight, None, &CancellationToken::new()).unwrap();
        assert_eq!(solution.counts, vec![2]);
    }
}
