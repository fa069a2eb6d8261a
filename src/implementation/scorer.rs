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

//! C7: weighs candidate plans under the caller's goal and picks a winner.
//! `balance_all` needs an FFD baseline to normalize against, so the baseline
//! is always computed first and threaded through every other score.
use std::cmp::Ordering;

use crate::common::NormalizedDemand;
use crate::implementation::heuristics::{best_fit_decreasing, first_fit_decreasing, HeuristicPlan};
use crate::request::Goal;

/// Roll count, summed waste, and roll cost for one candidate plan, plus the
/// per-tier priority-tiebreak trail carried along from the heuristic that
/// produced it (column generation and its rounding pass report no tiebreak
/// information, since there is only ever one column-generation candidate).
#[derive(Clone, Debug)]
pub struct Candidate {
    pub rolls: u64,
    pub waste: u64,
    pub cost: f64,
    pub efficiency: f64,
    pub last_roll_by_tier: [Option<usize>; 3],
}

impl Candidate {
    pub fn from_plan(plan: &HeuristicPlan, demand: &NormalizedDemand, master_roll_length: u64, unit_cost: f64) -> Candidate {
        from_totals(totals(&plan.usages, demand, master_roll_length), unit_cost, plan.last_roll_by_tier)
    }

    pub fn from_usages(
        usages: &[crate::common::PatternUsage],
        demand: &NormalizedDemand,
        master_roll_length: u64,
        unit_cost: f64,
    ) -> Candidate {
        from_totals(totals(usages, demand, master_roll_length), unit_cost, [None; 3])
    }
}

fn from_totals((rolls, waste, efficiency): (u64, u64, f64), unit_cost: f64, last_roll_by_tier: [Option<usize>; 3]) -> Candidate {
    Candidate {
        rolls,
        waste,
        cost: rolls as f64 * unit_cost,
        efficiency,
        last_roll_by_tier,
    }
}

/// `(rolls, waste, efficiency_percent)` for a plan against the given demand.
pub fn totals(usages: &[crate::common::PatternUsage], demand: &NormalizedDemand, master_roll_length: u64) -> (u64, u64, f64) {
    let rolls: u64 = usages.iter().map(|u| u.rolls_used).sum();
    let waste: u64 = usages.iter().map(|u| u.pattern.waste() * u.rolls_used).sum();
    let efficiency = if rolls == 0 {
        0.0
    } else {
        100.0 * demand.total_demanded_length() as f64 / (rolls as f64 * master_roll_length as f64)
    };
    (rolls, waste, efficiency)
}

/// The FFD baseline (R₀, W₀, C₀) that `balance_all` normalizes against.
#[derive(Clone, Copy, Debug)]
pub struct Baseline {
    pub rolls: f64,
    pub waste: f64,
    pub cost: f64,
}

impl Baseline {
    pub fn from_candidate(candidate: &Candidate) -> Baseline {
        Baseline {
            rolls: candidate.rolls.max(1) as f64,
            waste: candidate.waste.max(1) as f64,
            cost: candidate.cost.max(1e-9),
        }
    }
}

/// Lower is better for every goal.
pub fn score(candidate: &Candidate, goal: Goal, baseline: Baseline) -> f64 {
    match goal {
        Goal::MinimizeWaste => candidate.waste as f64,
        Goal::MinimizeRolls => candidate.rolls as f64,
        Goal::MinimizeCost => candidate.cost,
        Goal::BalanceAll => {
            let third = 1.0 / 3.0;
            third * (candidate.rolls as f64 / baseline.rolls)
                + third * (candidate.waste as f64 / baseline.waste)
                + third * (candidate.cost / baseline.cost)
        }
    }
}

/// Orders two equally-scored candidates by the priority tiebreak: earlier
/// satisfaction (smaller last-roll index) of high-priority pieces wins,
/// then normal, then low. A tier absent from both candidates (no demand of
/// that priority) is skipped.
pub fn priority_tiebreak(a: &Candidate, b: &Candidate) -> Ordering {
    for tier in 0..3 {
        match (a.last_roll_by_tier[tier], b.last_roll_by_tier[tier]) {
            (Some(x), Some(y)) if x != y => return x.cmp(&y),
            _ => continue,
        }
    }
    Ordering::Equal
}

/// Runs FFD and BFD, scores both under `goal`, and returns the winning
/// plan's usages. Ties are broken toward FFD.
pub fn hybrid(
    demand: &NormalizedDemand,
    master_roll_length: u64,
    goal: Goal,
    unit_cost: f64,
) -> (Vec<crate::common::PatternUsage>, HeuristicPlan, HeuristicPlan) {
    let raw_demand: Vec<crate::common::DemandItem> = demand.items().to_vec();
    let ffd = first_fit_decreasing(&raw_demand, master_roll_length);
    let bfd = best_fit_decreasing(&raw_demand, master_roll_length);

    let ffd_candidate = Candidate::from_plan(&ffd, demand, master_roll_length, unit_cost);
    let baseline = Baseline::from_candidate(&ffd_candidate);
    let bfd_candidate = Candidate::from_plan(&bfd, demand, master_roll_length, unit_cost);

    let ffd_score = score(&ffd_candidate, goal, baseline);
    let bfd_score = score(&bfd_candidate, goal, baseline);

    let bfd_wins = bfd_score < ffd_score - 1e-9
        || ((bfd_score - ffd_score).abs() <= 1e-9 && priority_tiebreak(&bfd_candidate, &ffd_candidate) == Ordering::Less);

    let usages = if bfd_wins { bfd.usages.clone() } else { ffd.usages.clone() };
    (usages, ffd, bfd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::implementation::normalizer::normalize;
    use crate::limits::SolverLimits;
    use crate::request::DemandLine;
    use crate::common::Priority;

    #[test]
    fn minimize_waste_prefers_the_lower_waste_candidate() {
        let demand = normalize(&[DemandLine::new(50, 2, Priority::Normal)], 100, &SolverLimits::default()).unwrap();
        let low_waste = Candidate::from_totals_for_test(1, 0, 1.0, 100.0);
        let high_waste = Candidate::from_totals_for_test(2, 100, 2.0, 50.0);
        let baseline = Baseline::from_candidate(&low_waste);
        assert!(score(&low_waste, Goal::MinimizeWaste, baseline) < score(&high_waste, Goal::MinimizeWaste, baseline));
        let _ = demand;
    }

    #[test]
    fn priority_tiebreak_prefers_earlier_high_priority_satisfaction() {
        let earlier = Candidate::from_totals_for_test(2, 10, 2.0, 90.0).with_tier(0, Some(0));
        let later = Candidate::from_totals_for_test(2, 10, 2.0, 90.0).with_tier(0, Some(1));
        assert_eq!(priority_tiebreak(&earlier, &later), Ordering::Less);
    }

    impl Candidate {
        fn from_totals_for_test(rolls: u64, waste: u64, cost: f64, efficiency: f64) -> Candidate {
            Candidate {
                rolls,
                waste,
                cost,
                efficiency,
                last_roll_by_tier: [None; 3],
            }
        }

        fn with_tier(mut self, tier: usize, value: Option<usize>) -> Candidate {
            self.last_roll_by_tier[tier] = value;
            self
        }
    }
}
