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

//! C6: the greedy heuristics. All three share one frame — fully expand the
//! demand into an explicit multiset of pieces, sorted descending by length,
//! ties kept in original demand order — and differ only in which open roll
//! receives the next piece.
use crate::common::{DemandItem, Pattern, PatternUsage, Priority};

struct ExpandedPiece {
    length: u64,
    priority: Priority,
}

fn expand(demand: &[DemandItem]) -> Vec<ExpandedPiece> {
    let mut pieces: Vec<ExpandedPiece> = Vec::new();
    for item in demand {
        for _ in 0..item.quantity {
            pieces.push(ExpandedPiece {
                length: item.length,
                priority: item.priority,
            });
        }
    }
    pieces.sort_by(|a, b| b.length.cmp(&a.length));
    pieces
}

fn tier(priority: Priority) -> usize {
    match priority {
        Priority::High => 0,
        Priority::Normal => 1,
        Priority::Low => 2,
    }
}

struct OpenRoll {
    pattern: Pattern,
    tiers_present: [bool; 3],
}

/// The output of one greedy pass: the merged plan plus, for each priority
/// tier (high, normal, low, in that order), the roll-opening index of the
/// last roll (before merging) that held a piece of that tier — the scorer's
/// priority tiebreak walks this triple in order.
pub struct HeuristicPlan {
    pub usages: Vec<PatternUsage>,
    pub last_roll_by_tier: [Option<usize>; 3],
}

impl HeuristicPlan {
    pub fn last_high_priority_roll(&self) -> Option<usize> {
        self.last_roll_by_tier[0]
    }
}

/// First-Fit Decreasing: each piece goes into the first open roll it fits,
/// opening a new one only when none does.
pub fn first_fit_decreasing(demand: &[DemandItem], master_roll_length: u64) -> HeuristicPlan {
    let pieces = expand(demand);
    let mut rolls: Vec<OpenRoll> = Vec::new();

    for piece in &pieces {
        let target = rolls
            .iter()
            .position(|r| r.pattern.remaining_capacity() >= piece.length);
        match target {
            Some(i) => place(&mut rolls, i, piece),
            None => open_and_place(&mut rolls, piece, master_roll_length),
        }
    }

    finish(rolls)
}

/// Best-Fit Decreasing: each piece goes into the open roll with the least
/// remaining capacity that still fits it (tightest fit), ties favoring the
/// older roll.
pub fn best_fit_decreasing(demand: &[DemandItem], master_roll_length: u64) -> HeuristicPlan {
    let pieces = expand(demand);
    let mut rolls: Vec<OpenRoll> = Vec::new();

    for piece in &pieces {
        let mut best: Option<(usize, u64)> = None;
        for (i, roll) in rolls.iter().enumerate() {
            let remaining = roll.pattern.remaining_capacity();
            if remaining >= piece.length {
                match best {
                    Some((_, best_remaining)) if remaining >= best_remaining => {}
                    _ => best = Some((i, remaining)),
                }
            }
        }
        match best {
            Some((i, _)) => place(&mut rolls, i, piece),
            None => open_and_place(&mut rolls, piece, master_roll_length),
        }
    }

    finish(rolls)
}

fn place(rolls: &mut [OpenRoll], index: usize, piece: &ExpandedPiece) {
    let roll = &mut rolls[index];
    roll.pattern = roll
        .pattern
        .with_piece_added(piece.length)
        .expect("caller only passes a roll whose remaining capacity already covers this piece");
    roll.tiers_present[tier(piece.priority)] = true;
}

fn open_and_place(rolls: &mut Vec<OpenRoll>, piece: &ExpandedPiece, master_roll_length: u64) {
    let pattern = Pattern::empty(master_roll_length)
        .with_piece_added(piece.length)
        .expect("a lone piece within the master roll length always fits");
    let mut tiers_present = [false; 3];
    tiers_present[tier(piece.priority)] = true;
    rolls.push(OpenRoll { pattern, tiers_present });
}

fn finish(rolls: Vec<OpenRoll>) -> HeuristicPlan {
    let mut last_roll_by_tier = [None; 3];
    for t in 0..3 {
        last_roll_by_tier[t] = rolls.iter().rposition(|r| r.tiers_present[t]);
    }
    let mut usages: Vec<PatternUsage> = Vec::new();
    for roll in rolls {
        match usages.iter_mut().find(|u| u.pattern == roll.pattern) {
            Some(usage) => usage.rolls_used += 1,
            None => usages.push(PatternUsage {
                pattern: roll.pattern,
                rolls_used: 1,
            }),
        }
    }
    HeuristicPlan {
        usages,
        last_roll_by_tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demand(items: &[(u64, u64)]) -> Vec<DemandItem> {
        items
            .iter()
            .map(|&(length, quantity)| DemandItem {
                length,
                quantity,
                priority: Priority::Normal,
            })
            .collect()
    }

    #[test]
    fn ffd_packs_two_pieces_that_exactly_fill_the_roll() {
        let plan = first_fit_decreasing(&demand(&[(50, 2)]), 100);
        assert_eq!(plan.usages.len(), 1);
        assert_eq!(plan.usages[0].rolls_used, 1);
        assert_eq!(plan.usages[0].pattern.waste(), 0);
    }

    #[test]
    fn ffd_opens_two_rolls_when_pieces_cannot_share_one() {
        let plan = first_fit_decreasing(&demand(&[(60, 1), (50, 1)]), 100);
        let total_rolls: u64 = plan.usages.iter().map(|u| u.rolls_used).sum();
        assert_eq!(total_rolls, 2);
    }

    #[test]
    fn bfd_prefers_the_tighter_fitting_open_roll() {
        let plan = best_fit_decreasing(&demand(&[(60, 1), (30, 1), (10, 1)]), 100);
        // 60 opens roll A (40 remaining); 30 fits roll A (10 remaining) tighter
        // than opening a new roll; 10 exactly fills roll A.
        assert_eq!(plan.usages.len(), 1);
        assert_eq!(plan.usages[0].pattern.waste(), 0);
    }

    #[test]
    fn every_demanded_piece_is_placed_exactly_once() {
        let plan = first_fit_decreasing(&demand(&[(3, 7)]), 10);
        let total_pieces: u64 = plan.usages.iter().map(|u| u.pattern.count_of(3) * u.rolls_used).sum();
        assert_eq!(total_pieces, 7);
    }

    #[test]
    fn tracks_the_last_roll_opened_for_a_high_priority_piece() {
        let demand = vec![
            DemandItem { length: 50, quantity: 1, priority: Priority::Normal },
            DemandItem { length: 50, quantity: 1, priority: Priority::High },
        ];
        let plan = first_fit_decreasing(&demand, 60);
        assert_eq!(plan.last_high_priority_roll(), Some(1));
    }
}
