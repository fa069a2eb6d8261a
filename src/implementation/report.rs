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

//! C8: assembles the chosen plan and the algorithm-step trace into the
//! public `SolveResult` record of §6.
use serde::{Deserialize, Serialize};

use crate::common::{AlgorithmStep, PatternUsage, PerformanceCounters};

/// One pattern as it appears in the public result: the canonical cuts plus
/// its derived fields, flattened for serialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub id: String,
    pub cuts: Vec<CutRecord>,
    pub total_length: u64,
    pub waste: u64,
    pub rolls_used: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CutRecord {
    pub length: u64,
    pub quantity: u64,
}

/// One line of the cutting-instruction listing, ordered per §4.8.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CuttingInstruction {
    pub step: usize,
    pub description: String,
    pub pattern: String,
    pub rolls_count: u64,
}

/// The full result of one `solve` call (§6).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    pub total_rolls: u64,
    pub efficiency: f64,
    pub waste_percentage: f64,
    pub total_waste: u64,
    pub cost_savings: f64,
    pub patterns: Vec<PatternRecord>,
    pub cutting_instructions: Vec<CuttingInstruction>,
    pub algorithm_steps: Vec<AlgorithmStep>,
    pub performance: PerformanceCounters,
}

/// Builds the final `SolveResult` from the winning plan. `ffd_cost` is the
/// FFD baseline cost used for `cost_savings = ffd_cost - chosen_cost`
/// (DESIGN.md records this as the resolved reading of an ambiguous source
/// behavior).
pub fn build(
    usages: Vec<PatternUsage>,
    master_roll_length: u64,
    unit_cost: f64,
    ffd_cost: f64,
    demand_total_length: u64,
    algorithm_steps: Vec<AlgorithmStep>,
    performance: PerformanceCounters,
) -> SolveResult {
    let mut ordered = usages;
    ordered.sort_by(|a, b| {
        b.rolls_used
            .cmp(&a.rolls_used)
            .then_with(|| b.pattern.total_length().cmp(&a.pattern.total_length()))
            .then_with(|| a.pattern.id().cmp(&b.pattern.id()))
    });

    let total_rolls: u64 = ordered.iter().map(|u| u.rolls_used).sum();
    let total_waste: u64 = ordered.iter().map(|u| u.pattern.waste() * u.rolls_used).sum();
    let efficiency = if total_rolls == 0 {
        0.0
    } else {
        100.0 * demand_total_length as f64 / (total_rolls as f64 * master_roll_length as f64)
    };
    let waste_percentage = 100.0 - efficiency;
    let chosen_cost = total_rolls as f64 * unit_cost;
    let cost_savings = ffd_cost - chosen_cost;

    let patterns: Vec<PatternRecord> = ordered
        .iter()
        .map(|usage| PatternRecord {
            id: usage.pattern.id(),
            cuts: usage
                .pattern
                .cuts()
                .iter()
                .map(|&(length, quantity)| CutRecord { length, quantity })
                .collect(),
            total_length: usage.pattern.total_length(),
            waste: usage.pattern.waste(),
            rolls_used: usage.rolls_used,
        })
        .collect();

    let cutting_instructions: Vec<CuttingInstruction> = ordered
        .iter()
        .enumerate()
        .map(|(i, usage)| CuttingInstruction {
            step: i + 1,
            description: format!("Cut {} roll(s) as {}", usage.rolls_used, usage.pattern.describe()),
            pattern: usage.pattern.describe(),
            rolls_count: usage.rolls_used,
        })
        .collect();

    SolveResult {
        total_rolls,
        efficiency,
        waste_percentage,
        total_waste,
        cost_savings,
        patterns,
        cutting_instructions,
        algorithm_steps,
        performance,
    }
}
