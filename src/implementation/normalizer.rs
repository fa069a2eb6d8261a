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

//! C1: expands and validates a caller's raw demand list into the canonical
//! form every downstream component relies on. Two inputs that normalize
//! identically must produce byte-identical results, so this is the one place
//! in the crate where merging/sorting happens.
use crate::common::{DemandItem, NormalizedDemand};
use crate::error::CutStockError;
use crate::limits::SolverLimits;
use crate::request::DemandLine;

/// Merges duplicate lengths (summing quantities, taking the max priority),
/// sorts descending by length, and validates every invariant from the
/// component design. Fails with `InvalidInput` rather than silently
/// dropping or clamping a malformed entry.
pub fn normalize(
    demand: &[DemandLine],
    master_roll_length: u64,
    limits: &SolverLimits,
) -> Result<NormalizedDemand, CutStockError> {
    if master_roll_length == 0 {
        return Err(CutStockError::InvalidInput(
            "master roll length must be positive".to_string(),
        ));
    }
    if demand.is_empty() {
        return Err(CutStockError::InvalidInput(
            "demand must not be empty".to_string(),
        ));
    }

    let mut merged: Vec<DemandItem> = Vec::new();
    for line in demand {
        if line.length == 0 {
            return Err(CutStockError::InvalidInput(format!(
                "piece length must be positive, got {}",
                line.length
            )));
        }
        if line.quantity == 0 {
            return Err(CutStockError::InvalidInput(format!(
                "quantity must be positive, got {}",
                line.quantity
            )));
        }
        if line.length > master_roll_length {
            return Err(CutStockError::InvalidInput(format!(
                "piece length {} exceeds master roll length {}",
                line.length, master_roll_length
            )));
        }

        match merged.iter_mut().find(|i| i.length == line.length) {
            Some(existing) => {
                existing.quantity += line.quantity;
                existing.priority = existing.priority.max(line.priority);
            }
            None => merged.push(DemandItem {
                length: line.length,
                quantity: line.quantity,
                priority: line.priority,
            }),
        }
    }

    let total_quantity: u64 = merged.iter().map(|i| i.quantity).sum();
    if total_quantity > limits.max_total_quantity {
        return Err(CutStockError::InvalidInput(format!(
            "total demanded quantity {} exceeds the configured cap of {}",
            total_quantity, limits.max_total_quantity
        )));
    }

    merged.sort_unstable_by(|a, b| b.length.cmp(&a.length));

    Ok(NormalizedDemand::from_sorted(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Priority;

    fn limits() -> SolverLimits {
        SolverLimits::default()
    }

    #[test]
    fn rejects_empty_demand() {
        let err = normalize(&[], 100, &limits());
        assert_eq!(
            err,
            Err(CutStockError::InvalidInput("demand must not be empty".to_string()))
        );
    }

    #[test]
    fn rejects_a_piece_longer_than_the_master_roll() {
        let demand = [DemandLine::new(150, 1, Priority::Normal)];
        assert!(normalize(&demand, 100, &limits()).is_err());
    }

    #[test]
    fn rejects_zero_length_or_zero_quantity() {
        assert!(normalize(&[DemandLine::new(0, 1, Priority::Normal)], 100, &limits()).is_err());
        assert!(normalize(&[DemandLine::new(10, 0, Priority::Normal)], 100, &limits()).is_err());
    }

    #[test]
    fn rejects_total_quantity_above_the_cap() {
        let mut tight = limits();
        tight.max_total_quantity = 5;
        let demand = [DemandLine::new(10, 6, Priority::Normal)];
        assert!(normalize(&demand, 100, &tight).is_err());
    }

    #[test]
    fn merges_duplicate_lengths_summing_quantity_and_taking_max_priority() {
        let demand = [
            DemandLine::new(50, 2, Priority::Low),
            DemandLine::new(50, 3, Priority::High),
        ];
        let normalized = normalize(&demand, 100, &limits()).unwrap();
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized.items()[0].quantity, 5);
        assert_eq!(normalized.items()[0].priority, Priority::High);
    }

    #[test]
    fn sorts_descending_by_length() {
        let demand = [
            DemandLine::new(30, 1, Priority::Normal),
            DemandLine::new(60, 1, Priority::Normal),
            DemandLine::new(45, 1, Priority::Normal),
        ];
        let normalized = normalize(&demand, 100, &limits()).unwrap();
        let lengths: Vec<u64> = normalized.items().iter().map(|i| i.length).collect();
        assert_eq!(lengths, vec![60, 45, 30]);
    }

    #[test]
    fn reordering_or_splitting_demand_entries_normalizes_identically() {
        let a = [
            DemandLine::new(50, 2, Priority::Normal),
            DemandLine::new(30, 1, Priority::Normal),
        ];
        let b = [
            DemandLine::new(30, 1, Priority::Normal),
            DemandLine::new(50, 1, Priority::Normal),
            DemandLine::new(50, 1, Priority::Normal),
        ];
        assert_eq!(
            normalize(&a, 100, &limits()).unwrap(),
            normalize(&b, 100, &limits()).unwrap()
        );
    }
}
