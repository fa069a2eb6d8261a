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

//! # cutstock
//! `cutstock` is a deterministic one-dimensional cutting-stock engine: given
//! a master roll length and a demand list of (piece length, quantity,
//! priority) triples, it computes a minimum-cost assignment of pieces to
//! stock rolls.
//!
//! The primary algorithm is column generation: a restricted-master LP (an
//! in-process two-phase simplex, see [`abstraction::lp`]) is alternated with
//! a bounded-knapsack pricing subproblem ([`implementation::knapsack`]) until
//! no pattern of positive reduced cost remains, then the fractional solution
//! is rounded to an integer plan. Three greedy heuristics — first-fit
//! decreasing, best-fit decreasing, and a hybrid of the two — are always
//! available as a faster or more robust alternative, and a goal-weighted
//! scorer ([`implementation::scorer`]) picks the winning plan.
//!
//! ```
//! use cutstock::{DemandLine, Algorithm, Goal, Priority, SolveRequest};
//!
//! let request = SolveRequest::new(
//!     100,
//!     Algorithm::ColumnGeneration,
//!     Goal::MinimizeRolls,
//!     vec![DemandLine::new(50, 2, Priority::Normal)],
//! );
//! let result = cutstock::solve(&request).unwrap();
//! assert_eq!(result.total_rolls, 1);
//! ```
//!
//! ## Side benefit
//! The `parallel` feature lets [`solve_range`] fan its per-length solves out
//! across all available cores without changing a single bit of the output.
pub mod abstraction;
pub mod cancellation;
pub mod common;
pub mod error;
pub mod implementation;
pub mod limits;
pub mod request;
pub mod result;
mod solve;
pub mod trace;

pub use common::{AlgorithmStep, Convergence, DemandItem, NormalizedDemand, Pattern, PatternUsage, PerformanceCounters, Priority, StepStatus};
pub use error::{CutStockError, CutStockResult};
pub use implementation::report::{CutRecord, CuttingInstruction, PatternRecord, SolveResult};
pub use limits::{SolverLimits, EPSILON};
pub use request::{Algorithm, DemandLine, Goal, ProgressEvent, RangeRequest, SolveRequest};
pub use result::{BestConfiguration, RangeEntry, RangeResult, RangeSummary};
pub use solve::{solve, solve_range, solve_range_with, solve_with};
