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

//! C4: the restricted master LP. The source calls out to an external,
//! dynamically-typed LP process; here that boundary collapses to a plain
//! trait so any backend honoring the four-tuple interface is substitutable.
use crate::common::{NormalizedDemand, Pattern};
use crate::error::CutStockError;

/// The primal/dual solution of one restricted master LP solve.
#[derive(Clone, Debug, PartialEq)]
pub struct LpSolution {
    /// `y*`, one entry per pattern in the pool, in pool order.
    pub primal: Vec<f64>,
    /// `d*`, one entry per normalized demand item, in demand order.
    pub duals: Vec<f64>,
    pub objective: f64,
}

/// `(A, q, pool) -> (y*, d*, objective)`. `A` is implicit: row `i` of the
/// constraint matrix is the count of demand item `i`'s length in each pool
/// pattern, which is exactly `Pattern::count_of`.
pub trait LpBackend {
    fn solve(&self, pool: &[Pattern], demand: &NormalizedDemand) -> Result<LpSolution, CutStockError>;
}
