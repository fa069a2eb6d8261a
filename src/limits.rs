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

//! This module gathers every tunable constant named in the component design
//! into a single `Default`-implementing struct, so a caller can override one
//! knob (say, a tighter time budget for interactive use) without touching the
//! others.
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Numerical tolerance below which a knapsack objective is treated as "no
/// improving column": `Z* <= 1 + EPSILON` terminates column generation.
pub const EPSILON: f64 = 1e-6;

/// Tunables shared by the knapsack pricer, the column generator and the
/// normalizer. Every field here corresponds to a named constant in the
/// component design; the `Default` impl reproduces the spec's defaults
/// exactly. `time_budget_s` is stored in seconds (rather than `Duration`)
/// so the struct round-trips through `serde` without a custom adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverLimits {
    /// Hard cap on the number of column-generation iterations.
    pub max_iterations: usize,
    /// Wall-clock budget, in seconds, for the whole column-generation loop.
    pub time_budget_s: f64,
    /// Above this many DP cells, the knapsack pricer switches from dense
    /// dynamic programming to best-first branch-and-bound.
    pub max_dp_cells: usize,
    /// Upper bound on `Σ qᵢ` accepted by the demand normalizer.
    pub max_total_quantity: u64,
    /// Node budget for the branch-and-bound fallback of the knapsack pricer
    /// (used only once `max_dp_cells` is exceeded).
    pub max_bb_nodes: usize,
}

impl SolverLimits {
    pub fn time_budget(&self) -> Duration {
        Duration::from_secs_f64(self.time_budget_s.max(0.0))
    }
}

impl Default for SolverLimits {
    fn default() -> SolverLimits {
        SolverLimits {
            max_iterations: 200,
            time_budget_s: 10.0,
            max_dp_cells: 10_000_000,
            max_total_quantity: 10_000,
            max_bb_nodes: 200_000,
        }
    }
}
