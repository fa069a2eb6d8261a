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

//! This module defines the error taxonomy shared by every component of the
//! solver. There is a single enum rather than one error type per component so
//! that `?` composes cleanly all the way from the knapsack pricer up through
//! `solve` and `solve_range`.
use thiserror::Error;

/// The four error kinds a solve can fail with. `InvalidInput` and `Cancelled`
/// are surfaced immediately (no report produced). `ResourceExceeded` and
/// `BackendFailure` are, during column generation, downgraded by the caller
/// into a HYBRID report labelled `convergence = error` rather than propagated
/// — see `implementation::column_generation`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CutStockError {
    /// The request itself is malformed: empty demand, non-positive lengths or
    /// quantities, a piece longer than the master roll, a quantity cap
    /// overrun, or an empty range sweep.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A resource budget (DP cell count, branch-and-bound node count, LP
    /// backend memory) was exceeded.
    #[error("resource budget exceeded: {0}")]
    ResourceExceeded(String),

    /// The caller's cancellation token fired while the solve was in progress.
    #[error("solve cancelled")]
    Cancelled,

    /// The LP backend reported an unexpected infeasible/unbounded status, or
    /// a numerical overflow was detected in the dual values.
    #[error("lp backend failure: {0}")]
    BackendFailure(String),
}

/// The result type returned by every public entry point of this crate.
pub type CutStockResult<T> = Result<T, CutStockError>;
