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

//! The result half of the external interface (§6): `SolveResult` lives in
//! `implementation::report`, since it is that component's direct output;
//! the range-sweep wrapper types live here since C9 has no other natural
//! home for them.
use serde::{Deserialize, Serialize};

use crate::implementation::report::SolveResult;

/// One `L` iteration's outcome within a range sweep: either a full result,
/// or a note that this configuration was skipped or failed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeEntry {
    pub master_roll_length: u64,
    pub optimization: Option<SolveResult>,
    pub skip_reason: Option<String>,
}

/// The configuration judged best by the active goal among the feasible
/// entries of a sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BestConfiguration {
    pub master_roll_length: u64,
    pub score: f64,
}

/// Aggregate statistics across every feasible `L` in a sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub count: usize,
    pub best_efficiency: f64,
    pub worst_efficiency: f64,
    pub mean_efficiency: f64,
    pub total_wall_time_s: f64,
}

/// The result of one `solve_range` call (§6).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeResult {
    pub results: Vec<RangeEntry>,
    pub best_configuration: BestConfiguration,
    pub summary: RangeSummary,
}
