#![cfg(test)]
//! Black-box scenario tests, one per named concrete example.
use cutstock::{Algorithm, DemandLine, Goal, Priority, SolveRequest};

fn request(master_roll_length: u64, demand: Vec<DemandLine>, algorithm: Algorithm, goal: Goal) -> SolveRequest {
    SolveRequest::new(master_roll_length, algorithm, goal, demand)
}

#[test]
fn s1_two_pieces_exactly_fill_one_roll() {
    let req = request(100, vec![DemandLine::new(50, 2, Priority::Normal)], Algorithm::ColumnGeneration, Goal::MinimizeWaste);
    let result = cutstock::solve(&req).unwrap();
    assert_eq!(result.total_rolls, 1);
    assert!((result.efficiency - 100.0).abs() < 1e-6);
    assert_eq!(result.patterns[0].cuts.len(), 1);
    assert_eq!(result.patterns[0].waste, 0);
}

#[test]
fn s2_first_fit_decreasing_opens_two_rolls_for_two_large_pieces() {
    let req = request(
        100,
        vec![DemandLine::new(60, 1, Priority::Normal), DemandLine::new(50, 1, Priority::Normal)],
        Algorithm::FirstFitDecreasing,
        Goal::MinimizeRolls,
    );
    let result = cutstock::solve(&req).unwrap();
    assert_eq!(result.total_rolls, 2);
    assert_eq!(result.total_waste, 80);
    assert!((result.efficiency - 55.0).abs() < 1e-6);
}

#[test]
fn s3_column_generation_combines_complementary_lengths() {
    let req = request(
        100,
        vec![
            DemandLine::new(60, 1, Priority::Normal),
            DemandLine::new(40, 1, Priority::Normal),
            DemandLine::new(30, 2, Priority::Normal),
        ],
        Algorithm::ColumnGeneration,
        Goal::MinimizeRolls,
    );
    let result = cutstock::solve(&req).unwrap();
    assert_eq!(result.total_rolls, 2);
    assert!((result.efficiency - 80.0).abs() < 1e-6);
}

#[test]
fn s4_mixed_lengths_hit_the_lp_lower_bound() {
    let req = request(
        600,
        vec![
            DemandLine::new(100, 5, Priority::Normal),
            DemandLine::new(150, 3, Priority::Normal),
            DemandLine::new(200, 2, Priority::Normal),
        ],
        Algorithm::ColumnGeneration,
        Goal::MinimizeWaste,
    );
    let result = cutstock::solve(&req).unwrap();
    assert_eq!(result.total_rolls, 3);
    assert!((result.efficiency - 75.0).abs() < 1e-6);
    for pattern in &result.patterns {
        assert!(pattern.waste <= 150);
    }
}

#[test]
fn s5_seven_small_pieces_fit_in_three_rolls() {
    let req = request(10, vec![DemandLine::new(3, 7, Priority::Normal)], Algorithm::ColumnGeneration, Goal::MinimizeRolls);
    let result = cutstock::solve(&req).unwrap();
    assert_eq!(result.total_rolls, 3);
    assert_eq!(result.total_waste, 9);
}

#[test]
fn s6_range_sweep_reports_monotonic_efficiency_summary() {
    use cutstock::RangeRequest;
    let req = RangeRequest {
        min: 100,
        max: 200,
        step: 10,
        unit_cost: 1.0,
        algorithm: Algorithm::ColumnGeneration,
        goal: Goal::MinimizeRolls,
        demand: vec![DemandLine::new(40, 5, Priority::Normal), DemandLine::new(60, 3, Priority::Normal)],
        limits: Default::default(),
    };
    let result = cutstock::solve_range(&req, |_| {}).unwrap();
    assert!(result.summary.count > 0);
    assert!(result.summary.best_efficiency >= result.summary.mean_efficiency);
    assert!(result.summary.mean_efficiency >= result.summary.worst_efficiency);
}
