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

//! Wires C1 and C6-C8 (and, for `column_generation`/`hybrid` requests, C3-C5)
//! into the two public entry points, `solve` and `solve_range`. This is the
//! only module that knows about every component at once; everything else
//! only knows its immediate neighbors.
use std::time::Instant;

use crate::cancellation::CancellationToken;
use crate::common::{AlgorithmStep, Convergence, PatternUsage, PerformanceCounters, StepStatus};
use crate::error::CutStockError;
use crate::implementation::report::{self, SolveResult};
use crate::implementation::simplex::TableauSimplex;
use crate::implementation::{column_generation, heuristics, normalizer, scorer};
use crate::request::{Algorithm, ProgressEvent, RangeRequest, SolveRequest};
use crate::result::RangeResult;
use crate::implementation::range;
use crate::trace::{NoopTracer, Tracer};

struct StepRecorder<'a> {
    steps: Vec<AlgorithmStep>,
    tracer: &'a mut dyn Tracer,
}

impl<'a> StepRecorder<'a> {
    fn new(tracer: &'a mut dyn Tracer) -> StepRecorder<'a> {
        StepRecorder { steps: Vec::new(), tracer }
    }

    /// Records one named step, forwarding both its `processing` and final
    /// transition to the tracer, and returns whatever `f` returns.
    fn run<T>(&mut self, name: &str, f: impl FnOnce() -> Result<T, CutStockError>) -> Result<T, CutStockError> {
        let step_number = self.steps.len() + 1;
        self.steps.push(AlgorithmStep {
            step: step_number,
            name: name.to_string(),
            status: StepStatus::Processing,
            duration_s: 0.0,
            detail: String::new(),
        });
        self.tracer.on_step(self.steps.last().unwrap());

        let started = Instant::now();
        let outcome = f();
        let duration_s = started.elapsed().as_secs_f64();

        let step = self.steps.last_mut().unwrap();
        step.duration_s = duration_s;
        match &outcome {
            Ok(_) => step.status = StepStatus::Completed,
            Err(e) => {
                step.status = StepStatus::Error;
                step.detail = e.to_string();
            }
        }
        let snapshot = self.steps.last().unwrap().clone();
        self.tracer.on_step(&snapshot);
        outcome
    }

    fn annotate_last(&mut self, detail: String) {
        if let Some(step) = self.steps.last_mut() {
            step.detail = detail;
        }
    }
}

/// Solves a single-`L` request with default observability (no tracer, a
/// fresh, never-fired cancellation token).
pub fn solve(request: &SolveRequest) -> Result<SolveResult, CutStockError> {
    solve_with(request, &CancellationToken::new(), &mut NoopTracer)
}

/// Solves a single-`L` request, forwarding every algorithm step to `tracer`
/// and honoring `cancellation`.
pub fn solve_with(
    request: &SolveRequest,
    cancellation: &CancellationToken,
    tracer: &mut dyn Tracer,
) -> Result<SolveResult, CutStockError> {
    let overall_start = Instant::now();
    let mut recorder = StepRecorder::new(tracer);

    let demand = recorder.run("normalize", || {
        normalizer::normalize(&request.demand, request.master_roll_length, &request.limits)
    })?;

    let ffd_baseline = heuristics::first_fit_decreasing(&demand.items().to_vec(), request.master_roll_length);
    let ffd_cost = ffd_baseline.usages.iter().map(|u| u.rolls_used).sum::<u64>() as f64 * request.unit_cost;

    let mut iterations = 0usize;
    let mut patterns_evaluated = 0usize;
    let mut convergence = Convergence::Optimal;

    let usages: Vec<PatternUsage> = match request.algorithm {
        Algorithm::FirstFitDecreasing => {
            recorder.run("greedy_first_fit_decreasing", || Ok(()))?;
            ffd_baseline.usages.clone()
        }
        Algorithm::BestFitDecreasing => {
            recorder
                .run("greedy_best_fit_decreasing", || {
                    Ok(heuristics::best_fit_decreasing(&demand.items().to_vec(), request.master_roll_length))
                })?
                .usages
        }
        Algorithm::Hybrid => {
            let (usages, _, _) = recorder.run("greedy_hybrid", || {
                Ok(scorer::hybrid(&demand, request.master_roll_length, request.goal, request.unit_cost))
            })?;
            usages
        }
        Algorithm::ColumnGeneration => {
            recorder.run("initialize_pool", || Ok(()))?;

            let backend = TableauSimplex::default();
            let cg_outcome = recorder.run("iterate_pricing", || {
                column_generation::solve(&demand, request.master_roll_length, &backend, &request.limits, cancellation)
            });

            let rounded = match cg_outcome {
                Ok(cg) => {
                    iterations = cg.iterations;
                    patterns_evaluated = cg.patterns_evaluated;
                    convergence = cg.convergence;
                    Some(cg.usages)
                }
                Err(CutStockError::Cancelled) => return Err(CutStockError::Cancelled),
                Err(CutStockError::InvalidInput(message)) => return Err(CutStockError::InvalidInput(message)),
                Err(failure) => {
                    convergence = Convergence::Error;
                    recorder.annotate_last(format!("{}; falling back to the hybrid heuristic", failure));
                    None
                }
            };

            recorder.run("round_to_integer", || Ok(rounded.clone().unwrap_or_default()))?;

            let (hybrid_usages, _, _) = scorer::hybrid(&demand, request.master_roll_length, request.goal, request.unit_cost);

            match rounded {
                None => hybrid_usages,
                Some(rounded) => {
                    let baseline = scorer::Baseline::from_candidate(&scorer::Candidate::from_plan(
                        &ffd_baseline,
                        &demand,
                        request.master_roll_length,
                        request.unit_cost,
                    ));
                    let rounded_candidate = scorer::Candidate::from_usages(&rounded, &demand, request.master_roll_length, request.unit_cost);
                    let hybrid_candidate =
                        scorer::Candidate::from_usages(&hybrid_usages, &demand, request.master_roll_length, request.unit_cost);
                    let rounded_score = scorer::score(&rounded_candidate, request.goal, baseline);
                    let hybrid_score = scorer::score(&hybrid_candidate, request.goal, baseline);
                    if hybrid_score < rounded_score - 1e-9 { hybrid_usages } else { rounded }
                }
            }
        }
    };

    recorder.run("finalize", || Ok(()))?;

    let performance = PerformanceCounters {
        execution_time_s: overall_start.elapsed().as_secs_f64(),
        memory_peak_bytes: 0,
        patterns_evaluated: patterns_evaluated.max(usages.len()),
        iterations,
        convergence,
    };

    Ok(report::build(
        usages,
        request.master_roll_length,
        request.unit_cost,
        ffd_cost,
        demand.total_demanded_length(),
        recorder.steps,
        performance,
    ))
}

/// Sweeps `solve` across `request`'s `[min, max]` progression of `L`,
/// reporting progress through `progress` as each `L` starts.
pub fn solve_range(request: &RangeRequest, progress: impl FnMut(ProgressEvent)) -> Result<RangeResult, CutStockError> {
    solve_range_with(request, &CancellationToken::new(), progress)
}

pub fn solve_range_with(
    request: &RangeRequest,
    cancellation: &CancellationToken,
    progress: impl FnMut(ProgressEvent),
) -> Result<RangeResult, CutStockError> {
    range::run(request, cancellation, progress)
}
