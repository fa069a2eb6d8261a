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

//! The external request/result types (§6 of the component design). These are
//! plain, `serde`-derived data: the core never reaches outside of them for
//! configuration, and the out-of-scope HTTP layer marshals them verbatim.
use serde::{Deserialize, Serialize};

use crate::common::Priority;
use crate::limits::SolverLimits;

/// One raw demand entry as supplied by a caller, before normalization.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemandLine {
    pub length: u64,
    pub quantity: u64,
    #[serde(default)]
    pub priority: Priority,
}

impl DemandLine {
    pub fn new(length: u64, quantity: u64, priority: Priority) -> DemandLine {
        DemandLine {
            length,
            quantity,
            priority,
        }
    }
}

/// Which family of algorithm should produce the primary candidate plan.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    ColumnGeneration,
    FirstFitDecreasing,
    BestFitDecreasing,
    Hybrid,
}

/// Which quantity the selector minimizes when comparing candidate plans.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    MinimizeWaste,
    MinimizeRolls,
    MinimizeCost,
    BalanceAll,
}

/// A single-`L` solve request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolveRequest {
    pub master_roll_length: u64,
    #[serde(default = "default_unit_cost")]
    pub unit_cost: f64,
    pub algorithm: Algorithm,
    pub goal: Goal,
    pub demand: Vec<DemandLine>,
    #[serde(default)]
    pub limits: SolverLimits,
}

fn default_unit_cost() -> f64 {
    1.0
}

impl SolveRequest {
    pub fn new(master_roll_length: u64, algorithm: Algorithm, goal: Goal, demand: Vec<DemandLine>) -> SolveRequest {
        SolveRequest {
            master_roll_length,
            unit_cost: default_unit_cost(),
            algorithm,
            goal,
            demand,
            limits: SolverLimits::default(),
        }
    }
}

/// A request to sweep the solver across an arithmetic progression of master
/// roll lengths, reusing the rest of a `SolveRequest`'s fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RangeRequest {
    pub min: u64,
    pub max: u64,
    pub step: u64,
    pub unit_cost: f64,
    pub algorithm: Algorithm,
    pub goal: Goal,
    pub demand: Vec<DemandLine>,
    #[serde(default)]
    pub limits: SolverLimits,
}

impl RangeRequest {
    /// The single-`L` request this range collapses to for a given length.
    pub(crate) fn at(&self, master_roll_length: u64) -> SolveRequest {
        SolveRequest {
            master_roll_length,
            unit_cost: self.unit_cost,
            algorithm: self.algorithm,
            goal: self.goal,
            demand: self.demand.clone(),
            limits: self.limits,
        }
    }
}

/// Progress reported once at the start of each `L` iteration of a range
/// sweep. Delivery is one-way and best-effort: dropping an event never
/// changes any field of the final result.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub completed: usize,
    pub total: usize,
    pub current_configuration: u64,
}
