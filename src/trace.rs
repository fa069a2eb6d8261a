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

//! The solve path performs no logging of its own (see PURPOSE & SCOPE): the
//! only observability surface is the `AlgorithmStep` trace already returned
//! as part of the report, plus this optional synchronous hook. It is the
//! structured analogue of the teacher's `verbosity`-gated `println!` calls
//! in its own branch-and-bound loop, minus the side effect by default.
use crate::common::AlgorithmStep;

/// A caller-supplied observer invoked once per step status transition, in
/// the order the steps occur. Supplying `None` costs nothing beyond a branch
/// per transition; the report itself is identical either way.
pub trait Tracer {
    fn on_step(&mut self, step: &AlgorithmStep);
}

/// Blanket impl so any `FnMut(&AlgorithmStep)` closure can be used directly
/// as a tracer.
impl<F: FnMut(&AlgorithmStep)> Tracer for F {
    fn on_step(&mut self, step: &AlgorithmStep) {
        self(step)
    }
}

/// A tracer that observes nothing. Used internally whenever a caller does
/// not supply one, so the recording code never has to special-case the
/// absence of a tracer.
#[derive(Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn on_step(&mut self, _step: &AlgorithmStep) {}
}
