#![cfg(test)]
//! Property-style checks of the universal invariants and the ambient-layer
//! contracts (error taxonomy, tracer, serde round-trip).
use cutstock::{Algorithm, CutStockError, DemandLine, Goal, Priority, SolveRequest, StepStatus};

fn basic_request() -> SolveRequest {
    SolveRequest::new(
        100,
        Algorithm::ColumnGeneration,
        Goal::MinimizeRolls,
        vec![DemandLine::new(60, 3, Priority::High), DemandLine::new(35, 4, Priority::Normal)],
    )
}

#[test]
fn demand_coverage_holds_for_every_normalized_length() {
    let request = basic_request();
    let result = cutstock::solve(&request).unwrap();
    for line in &request.demand {
        let mut produced = 0u64;
        for pattern in &result.patterns {
            for cut in &pattern.cuts {
                if cut.length == line.length {
                    produced += cut.quantity * pattern.rolls_used;
                }
            }
        }
        assert!(produced >= line.quantity, "length {} under-covered", line.length);
    }
}

#[test]
fn capacity_invariant_holds_for_every_pattern() {
    let request = basic_request();
    let result = cutstock::solve(&request).unwrap();
    let max_length = request.demand.iter().map(|d| d.length).max().unwrap();
    for pattern in &result.patterns {
        assert_eq!(pattern.total_length + pattern.waste, request.master_roll_length);
        assert!(pattern.waste < max_length || result.patterns.len() == 1);
    }
}

#[test]
fn consistency_invariant_holds_between_derived_fields() {
    let request = basic_request();
    let result = cutstock::solve(&request).unwrap();
    let total_rolls: u64 = result.patterns.iter().map(|p| p.rolls_used).sum();
    let total_waste: u64 = result.patterns.iter().map(|p| p.waste * p.rolls_used).sum();
    assert_eq!(total_rolls, result.total_rolls);
    assert_eq!(total_waste, result.total_waste);
    assert!((result.waste_percentage - (100.0 - result.efficiency)).abs() < 1e-6);
}

#[test]
fn determinism_two_solves_of_the_same_request_are_byte_identical() {
    let request = basic_request();
    let a = cutstock::solve(&request).unwrap();
    let b = cutstock::solve(&request).unwrap();
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

#[test]
fn algorithm_monotonicity_selector_never_loses_to_either_greedy_alone() {
    let mut ffd_request = basic_request();
    ffd_request.algorithm = Algorithm::FirstFitDecreasing;
    let mut bfd_request = basic_request();
    bfd_request.algorithm = Algorithm::BestFitDecreasing;
    let mut hybrid_request = basic_request();
    hybrid_request.algorithm = Algorithm::Hybrid;

    let ffd = cutstock::solve(&ffd_request).unwrap();
    let bfd = cutstock::solve(&bfd_request).unwrap();
    let hybrid = cutstock::solve(&hybrid_request).unwrap();

    // The selector must never pick worse than the better of the two greedy
    // candidates it compares — not merely "no worse than the worse one".
    assert!(hybrid.total_rolls <= ffd.total_rolls.min(bfd.total_rolls));
}

#[test]
fn lp_lower_bound_holds() {
    let request = basic_request();
    let result = cutstock::solve(&request).unwrap();
    let demanded_length: u64 = request.demand.iter().map(|d| d.length * d.quantity).sum();
    let lower_bound = (demanded_length + request.master_roll_length - 1) / request.master_roll_length;
    assert!(result.total_rolls >= lower_bound);
}

#[test]
fn reordering_and_splitting_demand_entries_yields_the_same_report() {
    let a = SolveRequest::new(
        100,
        Algorithm::ColumnGeneration,
        Goal::MinimizeRolls,
        vec![DemandLine::new(50, 2, Priority::Normal), DemandLine::new(30, 1, Priority::Normal)],
    );
    let b = SolveRequest::new(
        100,
        Algorithm::ColumnGeneration,
        Goal::MinimizeRolls,
        vec![
            DemandLine::new(30, 1, Priority::Normal),
            DemandLine::new(50, 1, Priority::Normal),
            DemandLine::new(50, 1, Priority::Normal),
        ],
    );
    let result_a = cutstock::solve(&a).unwrap();
    let result_b = cutstock::solve(&b).unwrap();
    assert_eq!(serde_json::to_string(&result_a).unwrap(), serde_json::to_string(&result_b).unwrap());
}

#[test]
fn a_single_piece_exactly_as_long_as_the_roll_wastes_nothing() {
    let request = SolveRequest::new(
        100,
        Algorithm::ColumnGeneration,
        Goal::MinimizeRolls,
        vec![DemandLine::new(100, 1, Priority::Normal)],
    );
    let result = cutstock::solve(&request).unwrap();
    assert_eq!(result.total_rolls, 1);
    assert_eq!(result.total_waste, 0);
    assert!((result.efficiency - 100.0).abs() < 1e-6);
}

#[test]
fn empty_demand_is_rejected_before_any_report_is_built() {
    let request = SolveRequest::new(100, Algorithm::ColumnGeneration, Goal::MinimizeRolls, vec![]);
    assert_eq!(cutstock::solve(&request), Err(CutStockError::InvalidInput("demand must not be empty".to_string())));
}

#[test]
fn a_piece_longer_than_the_master_roll_is_rejected() {
    let request = SolveRequest::new(
        100,
        Algorithm::ColumnGeneration,
        Goal::MinimizeRolls,
        vec![DemandLine::new(150, 1, Priority::Normal)],
    );
    assert!(cutstock::solve(&request).is_err());
}

#[test]
fn solver_limits_default_matches_the_documented_constants() {
    let limits = cutstock::SolverLimits::default();
    assert_eq!(limits.max_iterations, 200);
    assert_eq!(limits.time_budget_s, 10.0);
    assert_eq!(limits.max_dp_cells, 10_000_000);
    assert_eq!(limits.max_total_quantity, 10_000);
    assert!((cutstock::EPSILON - 1e-6).abs() < 1e-12);
}

#[test]
fn a_tracer_observes_the_same_steps_as_the_returned_trace() {
    let request = basic_request();
    let mut observed = Vec::new();
    let mut tracer = |step: &cutstock::AlgorithmStep| observed.push(step.name.clone());
    let result = cutstock::solve_with(&request, &cutstock::cancellation::CancellationToken::new(), &mut tracer).unwrap();

    let completed: Vec<String> = result
        .algorithm_steps
        .iter()
        .filter(|s| s.status == StepStatus::Completed || s.status == StepStatus::Error)
        .map(|s| s.name.clone())
        .collect();
    for name in &completed {
        assert!(observed.contains(name), "tracer never observed step {}", name);
    }
}

#[test]
fn solve_request_round_trips_through_json() {
    let request = basic_request();
    let json = serde_json::to_string(&request).unwrap();
    let restored: SolveRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.master_roll_length, request.master_roll_length);
    assert_eq!(restored.demand.len(), request.demand.len());
}

#[test]
fn solve_result_round_trips_through_json() {
    let request = basic_request();
    let result = cutstock::solve(&request).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let restored: cutstock::SolveResult = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, result);
}
