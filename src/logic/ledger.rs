//! Team score ledger: applying one match's results to a group's entries.

use crate::logic::points::{placement_points, ScoringStrategy};
use crate::models::{EntryOutcome, EntryStatus, MatchResult, ProgressionError, TeamScore};
use std::collections::HashSet;

/// Apply one match's results to `leaderboard` and refresh every entry's `total_points`.
///
/// Unknown teams and repeated teams are skipped and reported in the returned outcomes
/// (one per input entry, same order). An overflowing counter fails the call part-way,
/// so callers wanting all-or-nothing semantics apply this to a staged copy, see
/// [`crate::logic::submit_match_results`].
pub fn apply_match_results(
    leaderboard: &mut [TeamScore],
    results: &[MatchResult],
    scoring: &dyn ScoringStrategy,
) -> Result<Vec<EntryOutcome>, ProgressionError> {
    let mut seen = HashSet::new();
    let mut outcomes = Vec::with_capacity(results.len());
    for r in results {
        let status = if !seen.insert(r.team_id) {
            EntryStatus::SkippedDuplicateTeam
        } else if let Some(entry) = leaderboard.iter_mut().find(|e| e.team_id == r.team_id) {
            entry.record_match(r.rank, placement_points(r.rank), r.kills)?;
            EntryStatus::Applied
        } else {
            EntryStatus::SkippedUnknownTeam
        };
        outcomes.push(EntryOutcome {
            team_id: r.team_id,
            status,
        });
    }
    refresh_totals(leaderboard, scoring)?;
    Ok(outcomes)
}

/// Recompute the derived `total_points` of every entry.
pub fn refresh_totals(
    leaderboard: &mut [TeamScore],
    scoring: &dyn ScoringStrategy,
) -> Result<(), ProgressionError> {
    for entry in leaderboard.iter_mut() {
        entry.total_points = scoring
            .total_points(entry)
            .ok_or(ProgressionError::ScoreOverflow(entry.team_id))?;
    }
    Ok(())
}
