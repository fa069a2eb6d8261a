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

//! An in-process two-phase dense-tableau simplex, used as the default
//! `LpBackend`. Bland's rule (smallest index in, smallest index out on
//! ratio-test ties) is used throughout rather than the usual steepest-edge
//! or Dantzig rule, trading a few extra pivots for guaranteed termination
//! and bit-for-bit determinism.
//!
//! Tableau layout, `m` demand constraints and `n` pool patterns:
//! `[ y_1 .. y_n | s_1 .. s_m | a_1 .. a_m | rhs ]`, one row per constraint
//! plus a trailing reduced-cost row. Constraint `i` reads
//! `Σ_p a_pi·y_p - s_i + a_i = q_i`. Because the artificial columns start out
//! as the identity, their final reduced-cost row entries are exactly the
//! dual prices `π_i = c_B^T B^{-1} e_i` once phase 2's cost vector charges
//! artificials nothing.
use crate::abstraction::lp::{LpBackend, LpSolution};
use crate::common::{NormalizedDemand, Pattern};
use crate::error::CutStockError;

const EPS: f64 = 1e-9;
const MAX_PIVOTS: usize = 10_000;

/// The default, dependency-free LP backend used by the column generator.
#[derive(Default)]
pub struct TableauSimplex;

struct Tableau {
    rows: Vec<Vec<f64>>,
    cost: Vec<f64>,
    basis: Vec<usize>,
    n_struct: usize,
    n_surplus: usize,
    n_cols: usize,
}

impl Tableau {
    fn new(a: &[Vec<f64>], q: &[f64]) -> Tableau {
        let m = a.len();
        let n_struct = if m > 0 { a[0].len() } else { 0 };
        let n_cols = n_struct + 2 * m;
        let mut rows = vec![vec![0.0; n_cols + 1]; m];
        for i in 0..m {
            for j in 0..n_struct {
                rows[i][j] = a[i][j];
            }
            rows[i][n_struct + i] = -1.0; // surplus
            rows[i][n_struct + m + i] = 1.0; // artificial
            rows[i][n_cols] = q[i];
        }
        let basis = (0..m).map(|i| n_struct + m + i).collect();
        Tableau {
            rows,
            cost: vec![0.0; n_cols + 1],
            basis,
            n_struct,
            n_surplus: m,
            n_cols,
        }
    }

    fn m(&self) -> usize {
        self.rows.len()
    }

    fn artificial_col(&self, i: usize) -> usize {
        self.n_struct + self.n_surplus + i
    }

    /// Recomputes the reduced-cost row from scratch for the given objective
    /// cost vector, using the current (possibly already-pivoted) tableau.
    /// Valid because `cost[j] = cB^T * tableau_col(j) - c[j]` only depends
    /// on the current basis, not on how it was reached.
    fn recompute_cost_row(&mut self, c: &[f64]) {
        for j in 0..=self.n_cols {
            let cj = if j < self.n_cols { c[j] } else { 0.0 };
            let mut acc = 0.0;
            for i in 0..self.m() {
                acc += c[self.basis[i]] * self.rows[i][j];
            }
            self.cost[j] = acc - cj;
        }
    }

    /// Runs simplex pivots against the current `cost` row until optimal
    /// (no column in `eligible` has reduced cost `< -EPS`) or the pivot cap
    /// is hit. Bland's rule throughout.
    fn pivot_to_optimality(&mut self, eligible: impl Fn(usize) -> bool) -> Result<(), CutStockError> {
        for _ in 0..MAX_PIVOTS {
            let entering = (0..self.n_cols)
                .filter(|&j| eligible(j))
                .find(|&j| self.cost[j] < -EPS);
            let entering = match entering {
                Some(j) => j,
                None => return Ok(()),
            };

            let mut leaving_row: Option<usize> = None;
            let mut best_ratio = f64::INFINITY;
            for i in 0..self.m() {
                let coeff = self.rows[i][entering];
                if coeff > EPS {
                    let ratio = self.rows[i][self.n_cols] / coeff;
                    let better = ratio < best_ratio - EPS
                        || ((ratio - best_ratio).abs() <= EPS
                            && leaving_row.map_or(true, |r| self.basis[i] < self.basis[r]));
                    if better {
                        best_ratio = ratio;
                        leaving_row = Some(i);
                    }
                }
            }
            let pivot_row = match leaving_row {
                Some(r) => r,
                None => {
                    return Err(CutStockError::BackendFailure(
                        "lp master is unbounded in the entering direction".to_string(),
                    ))
                }
            };

            let pivot_value = self.rows[pivot_row][entering];
            for j in 0..=self.n_cols {
                self.rows[pivot_row][j] /= pivot_value;
            }
            for i in 0..self.m() {
                if i == pivot_row {
                    continue;
                }
                let factor = self.rows[i][entering];
                if factor.abs() > EPS {
                    for j in 0..=self.n_cols {
                        self.rows[i][j] -= factor * self.rows[pivot_row][j];
                    }
                }
            }
            let factor = self.cost[entering];
            if factor.abs() > EPS {
                for j in 0..=self.n_cols {
                    self.cost[j] -= factor * self.rows[pivot_row][j];
                }
            }
            self.basis[pivot_row] = entering;
        }
        Err(CutStockError::BackendFailure(
            "lp master did not converge within the pivot budget".to_string(),
        ))
    }

    fn value_of(&self, col: usize) -> f64 {
        match self.basis.iter().position(|&b| b == col) {
            Some(row) => self.rows[row][self.n_cols],
            None => 0.0,
        }
    }
}

impl LpBackend for TableauSimplex {
    fn solve(&self, pool: &[Pattern], demand: &NormalizedDemand) -> Result<LpSolution, CutStockError> {
        let m = demand.len();
        let n = pool.len();
        if m == 0 || n == 0 {
            return Err(CutStockError::BackendFailure(
                "lp master requires at least one demand item and one pattern".to_string(),
            ));
        }

        let a: Vec<Vec<f64>> = demand
            .items()
            .iter()
            .map(|item| pool.iter().map(|p| p.count_of(item.length) as f64).collect())
            .collect();
        let q: Vec<f64> = demand.items().iter().map(|item| item.quantity as f64).collect();

        let mut tableau = Tableau::new(&a, &q);

        // Phase 1: minimize the sum of artificial variables. Every
        // artificial starts basic, so cB = 1 for every row, making the
        // initial reduced costs `sum_i A[i][j] - c1[j]`.
        let mut phase1_cost = vec![0.0; tableau.n_cols];
        for j in (tableau.n_struct + tableau.n_surplus)..tableau.n_cols {
            phase1_cost[j] = 1.0;
        }
        tableau.recompute_cost_row(&phase1_cost);
        tableau.pivot_to_optimality(|_| true)?;

        let phase1_objective = -tableau.cost[tableau.n_cols];
        if phase1_objective.abs() > 1e-6 {
            return Err(CutStockError::BackendFailure(format!(
                "lp master is infeasible for the current pattern pool (phase 1 residual {:.6})",
                phase1_objective
            )));
        }

        // Pivot out any artificial that is still basic at zero level, where
        // possible, so phase 2 never has to reason about it.
        for i in 0..tableau.m() {
            let art_col = tableau.artificial_col(i);
            if tableau.basis[i] == art_col {
                if let Some(j) = (0..tableau.n_struct + tableau.n_surplus).find(|&j| tableau.rows[i][j].abs() > EPS) {
                    let pivot_value = tableau.rows[i][j];
                    for k in 0..=tableau.n_cols {
                        tableau.rows[i][k] /= pivot_value;
                    }
                    for r in 0..tableau.m() {
                        if r == i {
                            continue;
                        }
                        let factor = tableau.rows[r][j];
                        if factor.abs() > EPS {
                            for k in 0..=tableau.n_cols {
                                tableau.rows[r][k] -= factor * tableau.rows[i][k];
                            }
                        }
                    }
                    tableau.basis[i] = j;
                }
            }
        }

        // Phase 2: minimize Σ y_p. Artificials are never eligible to
        // re-enter the basis (their presence only matters for reading off
        // duals), which is simpler and just as correct as penalizing them
        // with a big-M cost.
        let mut phase2_cost = vec![0.0; tableau.n_cols];
        for j in 0..tableau.n_struct {
            phase2_cost[j] = 1.0;
        }
        tableau.recompute_cost_row(&phase2_cost);
        let n_struct = tableau.n_struct;
        let n_surplus = tableau.n_surplus;
        tableau.pivot_to_optimality(|j| j < n_struct + n_surplus)?;

        let primal: Vec<f64> = (0..n).map(|p| tableau.value_of(p).max(0.0)).collect();
        let duals: Vec<f64> = (0..m).map(|i| tableau.cost[tableau.artificial_col(i)]).collect();
        let objective: f64 = primal.iter().sum();

        Ok(LpSolution { primal, duals, objective })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::implementation::normalizer::normalize;
    use crate::limits::SolverLimits;
    use crate::request::DemandLine;
    use crate::common::Priority;

    #[test]
    fn singleton_pool_reproduces_the_trivial_feasible_solution() {
        let demand = normalize(&[DemandLine::new(50, 2, Priority::Normal)], 100, &SolverLimits::default()).unwrap();
        let pool = vec![Pattern::from_counts(vec![(50, 1)], 100).unwrap()];
        let solution = TableauSimplex::default().solve(&pool, &demand).unwrap();
        assert!((solution.primal[0] - 2.0).abs() < 1e-6);
        assert!((solution.objective - 2.0).abs() < 1e-6);
    }

    #[test]
    fn a_pattern_that_covers_two_lengths_at_once_is_preferred() {
        let demand = normalize(
            &[DemandLine::new(60, 1, Priority::Normal), DemandLine::new(40, 1, Priority::Normal)],
            100,
            &SolverLimits::default(),
        )
        .unwrap();
        let pool = vec![
            Pattern::from_counts(vec![(60, 1)], 100).unwrap(),
            Pattern::from_counts(vec![(40, 1)], 100).unwrap(),
            Pattern::from_counts(vec![(60, 1), (40, 1)], 100).unwrap(),
        ];
        let solution = TableauSimplex::default().solve(&pool, &demand).unwrap();
        assert!((solution.objective - 1.0).abs() < 1e-6);
        assert!((solution.primal[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn duals_are_nonnegative_for_a_covering_lp() {
        let demand = normalize(
            &[DemandLine::new(60, 1, Priority::Normal), DemandLine::new(40, 1, Priority::Normal)],
            100,
            &SolverLimits::default(),
        )
        .unwrap();
        let pool = vec![
            Pattern::from_counts(vec![(60, 1)], 100).unwrap(),
            Pattern::from_counts(vec![(40, 1)], 100).unwrap(),
        ];
        let solution = TableauSimplex::default().solve(&pool, &demand).unwrap();
        assert!(solution.duals.iter().all(|&d| d >= -1e-6));
    }
}
