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

//! C5: alternates the LP master (C4) and the knapsack pricer (C3) until no
//! column of positive reduced cost remains, then rounds the fractional
//! solution down to an integer plan, filling the residual with a greedy
//! heuristic pass.
use std::time::Instant;

use crate::abstraction::lp::LpBackend;
use crate::cancellation::CancellationToken;
use crate::common::{Convergence, DemandItem, NormalizedDemand, Pattern, PatternUsage};
use crate::error::CutStockError;
use crate::implementation::heuristics::first_fit_decreasing;
use crate::implementation::knapsack::{price, PricedItem};
use crate::limits::{SolverLimits, EPSILON};

/// The result of running column generation to a stopping condition: the
/// rounded integer plan, the convergence label, and the iteration count for
/// `PerformanceCounters`.
pub struct ColumnGenerationResult {
    pub usages: Vec<PatternUsage>,
    pub convergence: Convergence,
    pub iterations: usize,
    pub patterns_evaluated: usize,
}

/// Runs the column-generation loop of §4.5 against `demand`, then rounds.
/// `backend` is the LP master; swapping it for a different `LpBackend` never
/// changes the patterns considered, only how (y*, d*) is computed.
pub fn solve(
    demand: &NormalizedDemand,
    master_roll_length: u64,
    backend: &dyn LpBackend,
    limits: &SolverLimits,
    cancellation: &CancellationToken,
) -> Result<ColumnGenerationResult, CutStockError> {
    let start = Instant::now();
    let deadline = start + limits.time_budget();

    let mut pool: Vec<Pattern> = demand
        .items()
        .iter()
        .map(|item| Pattern::from_counts(vec![(item.length, 1)], master_roll_length))
        .collect::<Result<_, _>>()?;

    let mut iterations = 0usize;
    let mut convergence = Convergence::Optimal;

    loop {
        if cancellation.is_cancelled() {
            return Err(CutStockError::Cancelled);
        }
        if iterations >= limits.max_iterations || Instant::now() >= deadline {
            convergence = Convergence::Timeout;
            break;
        }

        let lp = backend.solve(&pool, demand)?;

        let priced_items: Vec<PricedItem> = demand
            .items()
            .iter()
            .zip(lp.duals.iter())
            .map(|(item, &dual)| PricedItem {
                length: item.length,
                dual,
                max_count: item.quantity,
            })
            .collect();

        let knapsack = price(&priced_items, master_roll_length, limits, Some(deadline), cancellation)?;

        if knapsack.objective <= 1.0 + EPSILON {
            convergence = Convergence::Optimal;
            break;
        }

        let counts: Vec<(u64, u64)> = demand
            .items()
            .iter()
            .zip(knapsack.counts.iter())
            .filter(|(_, &c)| c > 0)
            .map(|(item, &c)| (item.length, c))
            .collect();
        let new_pattern = Pattern::from_counts(counts, master_roll_length)?;

        if pool.iter().any(|p| *p == new_pattern) {
            convergence = Convergence::NearOptimal;
            break;
        }

        pool.push(new_pattern);
        iterations += 1;
    }

    let lp = backend.solve(&pool, demand)?;
    let (usages, rounding_gap) = round_to_integer(&pool, &lp.primal, demand, master_roll_length);
    if rounding_gap > 1 && convergence == Convergence::Optimal {
        convergence = Convergence::NearOptimal;
    }

    Ok(ColumnGenerationResult {
        usages,
        convergence,
        iterations,
        patterns_evaluated: pool.len(),
    })
}

/// `zₚ = ⌊y*ₚ⌋` for each pattern in decreasing `y*ₚ` order, then the residual
/// demand is satisfied with first-fit-decreasing over the full pool. Returns
/// the rounding gap in rolls: the fractional `y*ₚ − zₚ` lost at every pattern
/// (floors discard a fraction each time, and those fractions accumulate
/// across length classes) plus every roll the residual fill had to add on
/// top. This can exceed 1 roll even though any single pattern's fraction is
/// always in `[0,1)`.
fn round_to_integer(
    pool: &[Pattern],
    primal: &[f64],
    demand: &NormalizedDemand,
    master_roll_length: u64,
) -> (Vec<PatternUsage>, u64) {
    let mut order: Vec<usize> = (0..pool.len()).collect();
    order.sort_by(|&a, &b| primal[b].partial_cmp(&primal[a]).unwrap_or(std::cmp::Ordering::Equal));

    let mut residual: Vec<DemandItem> = demand.items().to_vec();
    let mut usages: Vec<PatternUsage> = Vec::new();
    let mut fractional_loss = 0.0f64;

    for &idx in &order {
        let z = primal[idx].floor() as u64;
        fractional_loss += primal[idx] - z as f64;
        if z == 0 {
            continue;
        }
        for item in residual.iter_mut() {
            let taken = pool[idx].count_of(item.length) * z;
            item.quantity = item.quantity.saturating_sub(taken);
        }
        usages.push(PatternUsage {
            pattern: pool[idx].clone(),
            rolls_used: z,
        });
    }

    residual.retain(|item| item.quantity > 0);
    let mut filler_rolls = 0u64;
    if !residual.is_empty() {
        let filler = first_fit_decreasing(&residual, master_roll_length);
        for usage in filler.usages {
            filler_rolls += usage.rolls_used;
            match usages.iter_mut().find(|u| u.pattern == usage.pattern) {
                Some(existing) => existing.rolls_used += usage.rolls_used,
                None => usages.push(usage),
            }
        }
    }

    let rounding_gap = fractional_loss.ceil() as u64 + filler_rolls;
    (usages, rounding_gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::implementation::normalizer::normalize;
    use crate::implementation::simplex::TableauSimplex;
    use crate::request::DemandLine;
    use crate::common::Priority;

    #[test]
    fn covers_demand_exactly_for_a_trivially_packable_instance() {
        let demand = normalize(&[DemandLine::new(50, 2, Priority::Normal)], 100, &SolverLimits::default()).unwrap();
        let backend = TableauSimplex::default();
        let result = solve(&demand, 100, &backend, &SolverLimits::default(), &CancellationToken::new()).unwrap();
        let rolls: u64 = result.usages.iter().map(|u| u.rolls_used).sum();
        assert_eq!(rolls, 1);
        assert_eq!(result.convergence, Convergence::Optimal);
    }

    #[test]
    fn combines_two_lengths_into_one_pattern_when_it_fits() {
        let demand = normalize(
            &[DemandLine::new(60, 1, Priority::Normal), DemandLine::new(40, 1, Priority::Normal)],
            100,
            &SolverLimits::default(),
        )
        .unwrap();
        let backend = TableauSimplex::default();
        let result = solve(&demand, 100, &backend, &SolverLimits::default(), &CancellationToken::new()).unwrap();
        let rolls: u64 = result.usages.iter().map(|u| u.rolls_used).sum();
        assert_eq!(rolls, 1);
    }

    #[test]
    fn respects_demand_coverage_on_a_slightly_awkward_instance() {
        let demand = normalize(
            &[DemandLine::new(3, 7, Priority::Normal)],
            10,
            &SolverLimits::default(),
        )
        .unwrap();
        let backend = TableauSimplex::default();
        let result = solve(&demand, 10, &backend, &SolverLimits::default(), &CancellationToken::new()).unwrap();
        let produced: u64 = result
            .usages
            .iter()
            .map(|u| u.pattern.count_of(3) * u.rolls_used)
            .sum();
        assert!(produced >= 7);
    }
}
