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

//! C9: sweeps `solve` across an arithmetic progression of master roll
//! lengths. Sequential by default; the `parallel` feature fans the per-L
//! solves out across a thread-per-core pool, mirroring the teacher's own
//! parallel solver module, while still delivering byte-identical output and
//! L-ascending progress.
use std::time::Instant;

use crate::cancellation::CancellationToken;
use crate::error::CutStockError;
use crate::implementation::scorer::{self, Baseline, Candidate};
use crate::request::{ProgressEvent, RangeRequest};
use crate::result::{BestConfiguration, RangeEntry, RangeResult, RangeSummary};
use crate::solve::solve_with;
use crate::trace::NoopTracer;

fn lengths(request: &RangeRequest) -> Result<Vec<u64>, CutStockError> {
    if request.min == 0 || request.max == 0 {
        return Err(CutStockError::InvalidInput(
            "range bounds must be positive".to_string(),
        ));
    }
    if request.min > request.max {
        return Err(CutStockError::InvalidInput(
            "range minimum must not exceed the maximum".to_string(),
        ));
    }
    if request.step == 0 {
        return Err(CutStockError::InvalidInput("range step must be positive".to_string()));
    }
    let mut values = Vec::new();
    let mut l = request.min;
    while l <= request.max {
        values.push(l);
        l += request.step;
    }
    Ok(values)
}

fn run_one(request: &RangeRequest, master_roll_length: u64, cancellation: &CancellationToken) -> RangeEntry {
    let single = request.at(master_roll_length);
    match solve_with(&single, cancellation, &mut NoopTracer) {
        Ok(result) => RangeEntry {
            master_roll_length,
            optimization: Some(result),
            skip_reason: None,
        },
        Err(CutStockError::InvalidInput(message)) => RangeEntry {
            master_roll_length,
            optimization: None,
            skip_reason: Some(message),
        },
        Err(other) => RangeEntry {
            master_roll_length,
            optimization: None,
            skip_reason: Some(other.to_string()),
        },
    }
}

/// Runs the sweep sequentially, calling `progress` once per `L` before its
/// solve starts.
#[cfg(not(feature = "parallel"))]
pub fn run(
    request: &RangeRequest,
    cancellation: &CancellationToken,
    mut progress: impl FnMut(ProgressEvent),
) -> Result<RangeResult, CutStockError> {
    let start = Instant::now();
    let all_lengths = lengths(request)?;
    let total = all_lengths.len();
    let mut entries = Vec::with_capacity(total);

    for (completed, &l) in all_lengths.iter().enumerate() {
        if cancellation.is_cancelled() {
            return Err(CutStockError::Cancelled);
        }
        progress(ProgressEvent {
            completed,
            total,
            current_configuration: l,
        });
        entries.push(run_one(request, l, cancellation));
    }

    finish(entries, request, start.elapsed().as_secs_f64())
}

/// Runs the sweep across a `crossbeam::scope` of `num_cpus::get()` worker
/// threads, each pulling the next unclaimed `L` from a shared cursor guarded
/// by a `parking_lot::Mutex`. Progress events and the final entry order are
/// both normalized back to L-ascending after the scope joins, so the
/// observable behavior matches the sequential path exactly.
#[cfg(feature = "parallel")]
pub fn run(
    request: &RangeRequest,
    cancellation: &CancellationToken,
    mut progress: impl FnMut(ProgressEvent),
) -> Result<RangeResult, CutStockError> {
    use parking_lot::Mutex;

    let start = Instant::now();
    let all_lengths = lengths(request)?;
    let total = all_lengths.len();
    let cursor = Mutex::new(0usize);
    let results: Mutex<Vec<Option<RangeEntry>>> = Mutex::new(vec![None; total]);
    let worker_count = num_cpus::get().max(1).min(total.max(1));

    crossbeam::scope(|scope| {
        for _ in 0..worker_count {
            scope.spawn(|_| loop {
                if cancellation.is_cancelled() {
                    return;
                }
                let idx = {
                    let mut next = cursor.lock();
                    if *next >= total {
                        return;
                    }
                    let idx = *next;
                    *next += 1;
                    idx
                };
                let entry = run_one(request, all_lengths[idx], cancellation);
                results.lock()[idx] = Some(entry);
            });
        }
    })
    .expect("range sweep worker thread panicked");

    if cancellation.is_cancelled() {
        return Err(CutStockError::Cancelled);
    }

    let entries: Vec<RangeEntry> = results
        .into_inner()
        .into_iter()
        .map(|e| e.expect("every cursor slot is claimed exactly once"))
        .collect();

    for (completed, entry) in entries.iter().enumerate() {
        progress(ProgressEvent {
            completed,
            total,
            current_configuration: entry.master_roll_length,
        });
    }

    finish(entries, request, start.elapsed().as_secs_f64())
}

/// Builds a scorer `Candidate` from the already-computed `SolveResult`
/// totals, without reconstructing the patterns themselves — the range
/// driver only ever compares whole-plan totals across `L`, never the
/// priority tiebreak (that was already resolved inside each per-L solve).
fn candidate_of(result: &crate::implementation::report::SolveResult, unit_cost: f64) -> Candidate {
    Candidate {
        rolls: result.total_rolls,
        waste: result.total_waste,
        cost: result.total_rolls as f64 * unit_cost,
        efficiency: result.efficiency,
        last_roll_by_tier: [None; 3],
    }
}

fn finish(entries: Vec<RangeEntry>, request: &RangeRequest, total_wall_time_s: f64) -> Result<RangeResult, CutStockError> {
    let feasible: Vec<&RangeEntry> = entries.iter().filter(|e| e.optimization.is_some()).collect();
    if feasible.is_empty() {
        return Err(CutStockError::InvalidInput(
            "no master roll length in the requested range admits a feasible plan".to_string(),
        ));
    }

    let baseline = Baseline::from_candidate(&candidate_of(feasible[0].optimization.as_ref().unwrap(), request.unit_cost));

    let mut best: Option<(u64, f64)> = None;
    let mut efficiencies = Vec::with_capacity(feasible.len());
    for entry in &feasible {
        let result = entry.optimization.as_ref().unwrap();
        efficiencies.push(result.efficiency);
        let candidate = candidate_of(result, request.unit_cost);
        let score = scorer::score(&candidate, request.goal, baseline);
        if best.map_or(true, |(_, best_score)| score < best_score) {
            best = Some((entry.master_roll_length, score));
        }
    }

    let best_configuration = match best {
        Some((master_roll_length, score)) => BestConfiguration { master_roll_length, score },
        None => BestConfiguration {
            master_roll_length: feasible[0].master_roll_length,
            score: 0.0,
        },
    };

    let count = efficiencies.len();
    let best_efficiency = efficiencies.iter().cloned().fold(f64::MIN, f64::max);
    let worst_efficiency = efficiencies.iter().cloned().fold(f64::MAX, f64::min);
    let mean_efficiency = efficiencies.iter().sum::<f64>() / count as f64;

    Ok(RangeResult {
        results: entries,
        best_configuration,
        summary: RangeSummary {
            count,
            best_efficiency,
            worst_efficiency,
            mean_efficiency,
            total_wall_time_s,
        },
    })
}
