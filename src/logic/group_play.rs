//! Group stage: result submission, completion and qualification.

use crate::logic::ledger::apply_match_results;
use crate::logic::points::{RankingPolicy, ScoringStrategy};
use crate::models::{
    EntryOutcome, EntryStatus, Group, MatchResult, ProgressionError, Round, Status, TeamId,
    TeamScore,
};

/// Round-level settings a group is played under.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GroupRules {
    /// `None` (or 0) falls back to the group's own `total_match`.
    pub matches_per_group: Option<u32>,
    pub qualifying_teams: u32,
}

impl GroupRules {
    pub fn from_round(round: &Round) -> Self {
        Self {
            matches_per_group: Some(round.matches_per_group),
            qualifying_teams: round.qualifying_teams,
        }
    }
}

/// Submit one finished match for `group`.
///
/// 1. Reject if the group already completed or the batch is empty.
/// 2. Apply every entry to a staged copy of the group (unknown/duplicate teams are skipped,
///    counters that would overflow reject the whole batch).
/// 3. Count the match; the group becomes `Ongoing`, or `Completed` once all matches are played.
/// 4. On completion, flag the top `qualifying_teams` entries as qualified.
///
/// The staged copy replaces `group` only when every step succeeded, so a failed call
/// leaves the group untouched.
pub fn submit_match_results(
    group: &mut Group,
    rules: GroupRules,
    results: &[MatchResult],
    scoring: &dyn ScoringStrategy,
    ranking: &dyn RankingPolicy,
) -> Result<Vec<EntryOutcome>, ProgressionError> {
    if group.status == Status::Completed {
        return Err(ProgressionError::GroupAlreadyCompleted(group.id));
    }
    if results.is_empty() {
        return Err(ProgressionError::EmptyResults);
    }
    let total = group.effective_total_match(rules.matches_per_group);
    if group.matches_played >= total {
        log::error!(
            "Group {} is open but has already played {} of {} matches",
            group.id,
            group.matches_played,
            total
        );
        return Err(ProgressionError::MatchesExceeded {
            group: group.id,
            played: group.matches_played,
            total,
        });
    }

    let mut next = group.clone();
    let outcomes = apply_match_results(&mut next.leaderboard, results, scoring)?;
    for o in outcomes.iter().filter(|o| o.status != EntryStatus::Applied) {
        log::warn!(
            "Group {}: skipped result for team {} ({:?})",
            group.id,
            o.team_id,
            o.status
        );
    }

    next.matches_played += 1;
    if next.matches_played < total {
        next.status = Status::Ongoing;
    } else {
        next.status = Status::Completed;
        let qualified = qualify(&mut next, rules.qualifying_teams, ranking)?;
        log::info!(
            "Group {} ({}) completed after {} matches; qualified: {:?}",
            next.id,
            next.name,
            next.matches_played,
            qualified
        );
    }

    *group = next;
    Ok(outcomes)
}

/// Flag the best `qualifying_teams` entries of a completed group as qualified and clear the rest.
/// Returns the qualified teams best-first. Ties keep ledger order.
pub fn qualify(
    group: &mut Group,
    qualifying_teams: u32,
    ranking: &dyn RankingPolicy,
) -> Result<Vec<TeamId>, ProgressionError> {
    if group.status != Status::Completed {
        log::error!("Qualification requested for group {} in status {}", group.id, group.status);
        return Err(ProgressionError::QualificationBeforeCompletion(group.id));
    }
    let mut order: Vec<usize> = (0..group.leaderboard.len()).collect();
    order.sort_by(|&a, &b| ranking.compare(&group.leaderboard[a], &group.leaderboard[b]));

    let cutoff = (qualifying_teams as usize).min(order.len());
    for (place, &idx) in order.iter().enumerate() {
        group.leaderboard[idx].is_qualified = place < cutoff;
    }
    Ok(order[..cutoff]
        .iter()
        .map(|&idx| group.leaderboard[idx].team_id)
        .collect())
}

/// Ledger entries best-first, without reordering the stored ledger.
pub fn standings<'a>(group: &'a Group, ranking: &dyn RankingPolicy) -> Vec<&'a TeamScore> {
    let mut entries: Vec<&TeamScore> = group.leaderboard.iter().collect();
    entries.sort_by(|a, b| ranking.compare(a, b));
    entries
}
