//! Placement point table plus the scoring and ranking policies used across matches.

use crate::models::TeamScore;
use std::cmp::Ordering;

/// Points for placements 1 through 10.
const POINT_TABLE: [u32; 10] = [12, 9, 8, 7, 6, 5, 4, 3, 2, 1];

/// Points awarded for finishing a match at `rank`. Ranks outside 1..=10 earn nothing.
pub fn placement_points(rank: u32) -> u32 {
    match rank {
        1..=10 => POINT_TABLE[(rank - 1) as usize],
        _ => 0,
    }
}

/// Turns a ledger entry's counters into the value teams are ranked by.
/// `None` means the value does not fit in a `u32`.
pub trait ScoringStrategy: Send + Sync {
    fn total_points(&self, entry: &TeamScore) -> Option<u32>;
}

/// `score + kills * kill_weight + wins * win_bonus`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WeightedScoring {
    pub kill_weight: u32,
    pub win_bonus: u32,
}

impl Default for WeightedScoring {
    fn default() -> Self {
        Self {
            kill_weight: 2,
            win_bonus: 5,
        }
    }
}

impl ScoringStrategy for WeightedScoring {
    fn total_points(&self, entry: &TeamScore) -> Option<u32> {
        let kills = entry.kills.checked_mul(self.kill_weight)?;
        let wins = entry.wins.checked_mul(self.win_bonus)?;
        entry.score.checked_add(kills)?.checked_add(wins)
    }
}

/// Orders ledger entries best-first. Used with a stable sort, so `Equal` keeps ledger order.
pub trait RankingPolicy: Send + Sync {
    fn compare(&self, a: &TeamScore, b: &TeamScore) -> Ordering;
}

/// Higher `total_points` first; ties stay in ledger order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TotalPointsDescending;

impl RankingPolicy for TotalPointsDescending {
    fn compare(&self, a: &TeamScore, b: &TeamScore) -> Ordering {
        b.total_points.cmp(&a.total_points)
    }
}
