//! Round lifecycle: creation guard, group seeding, completion cascade, deletion guard.

use crate::logic::event::{mark_completed, start_event};
use crate::models::{Event, Group, GroupId, NewRound, ProgressionError, Round, Status, TeamId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// True when the round has groups and every one of them completed.
/// Groups missing from `group_status` count as incomplete.
pub fn all_groups_completed(round: &Round, group_status: &HashMap<GroupId, Status>) -> bool {
    !round.groups.is_empty()
        && round
            .groups
            .iter()
            .all(|id| group_status.get(id).is_some_and(|s| s.is_completed()))
}

/// Check whether the event may take another round.
///
/// Refused when the event completed, when its latest round is a grand finale, or when
/// any unfinished round still has open groups (or no groups yet). A round still marked
/// `Ongoing` whose groups all completed does not block.
pub fn check_round_creation(
    event: &Event,
    rounds: &[&Round],
    group_status: &HashMap<GroupId, Status>,
) -> Result<(), ProgressionError> {
    if event.progress == Status::Completed {
        return Err(ProgressionError::EventCompleted(event.id));
    }
    if let Some(latest) = rounds.iter().max_by_key(|r| r.number) {
        if latest.is_grand_finale() {
            return Err(ProgressionError::GrandFinaleReached(event.id));
        }
    }
    if let Some(open) = rounds
        .iter()
        .find(|r| r.status != Status::Completed && !all_groups_completed(r, group_status))
    {
        return Err(ProgressionError::RoundInProgress(open.id));
    }
    Ok(())
}

/// Upper bound on matches a group can be scheduled for.
pub const MAX_MATCHES_PER_GROUP: u32 = 100;

/// Reject configurations that cannot be played.
pub fn validate_new_round(input: &NewRound) -> Result<(), ProgressionError> {
    if input.name.trim().is_empty() {
        return Err(ProgressionError::EmptyRoundName);
    }
    if input.matches_per_group == 0 {
        return Err(ProgressionError::InvalidRoundConfig("matches_per_group"));
    }
    if input.matches_per_group > MAX_MATCHES_PER_GROUP {
        return Err(ProgressionError::RoundConfigTooLarge {
            field: "matches_per_group",
            max: MAX_MATCHES_PER_GROUP,
        });
    }
    if input.qualifying_teams == 0 {
        return Err(ProgressionError::InvalidRoundConfig("qualifying_teams"));
    }
    if input.teams_per_group == Some(0) {
        return Err(ProgressionError::InvalidRoundConfig("teams_per_group"));
    }
    Ok(())
}

/// Create the next round of `event`.
/// The round is numbered after the existing ones and starts `Pending`.
pub fn create_round(
    event: &mut Event,
    rounds: &[&Round],
    group_status: &HashMap<GroupId, Status>,
    mut input: NewRound,
    default_teams_per_group: u32,
) -> Result<Round, ProgressionError> {
    check_round_creation(event, rounds, group_status)?;
    validate_new_round(&input)?;

    input.name = input.name.trim().to_string();
    let teams_per_group = input.teams_per_group.unwrap_or(default_teams_per_group).max(1);
    let number = rounds.len() as u32 + 1;
    let round = Round::new(event.id, number, input, teams_per_group);
    start_event(event);
    log::info!(
        "Round {} ({}) created as round #{} of event {}",
        round.id,
        round.name,
        round.number,
        event.id
    );
    Ok(round)
}

/// The round before `round` in the same event, by number.
pub fn previous_round<'a>(round: &Round, rounds: &[&'a Round]) -> Option<&'a Round> {
    rounds
        .iter()
        .filter(|r| r.event_id == round.event_id && r.number < round.number)
        .max_by_key(|r| r.number)
        .copied()
}

/// Teams entering `round`: the event's registered teams for the first round, otherwise
/// the qualifiers of the previous round's groups in group order.
pub fn team_pool(
    event: &Event,
    previous: Option<&Round>,
    groups: &HashMap<GroupId, Group>,
) -> Result<Vec<TeamId>, ProgressionError> {
    let Some(prev) = previous else {
        return Ok(event.teams.clone());
    };
    if prev.status != Status::Completed {
        return Err(ProgressionError::PreviousRoundIncomplete(prev.id));
    }
    let pool = prev
        .groups
        .iter()
        .filter_map(|id| groups.get(id))
        .flat_map(|g| g.qualified_teams())
        .collect();
    Ok(pool)
}

/// Shuffle `pool` and split it into `ceil(n / teams_per_group)` groups.
/// Group sizes differ by at most one.
pub fn distribute_teams<R: Rng + ?Sized>(
    pool: &[TeamId],
    teams_per_group: u32,
    rng: &mut R,
) -> Vec<Vec<TeamId>> {
    if pool.is_empty() {
        return Vec::new();
    }
    let mut teams = pool.to_vec();
    teams.shuffle(rng);

    let group_count = teams.len().div_ceil(teams_per_group.max(1) as usize);
    let mut split = vec![Vec::new(); group_count];
    for (i, team) in teams.into_iter().enumerate() {
        split[i % group_count].push(team);
    }
    split
}

/// Build the groups of `round` from `pool`, each with a zeroed ledger entry per team.
pub fn seed_groups<R: Rng + ?Sized>(
    round: &Round,
    pool: &[TeamId],
    default_total_match: u32,
    rng: &mut R,
) -> Result<Vec<Group>, ProgressionError> {
    if !round.groups.is_empty() {
        return Err(ProgressionError::GroupsAlreadyCreated(round.id));
    }
    if pool.is_empty() {
        return Err(ProgressionError::NoTeamsAvailable(round.id));
    }
    let total_match = if round.matches_per_group > 0 {
        round.matches_per_group
    } else {
        default_total_match
    };
    let groups: Vec<Group> = distribute_teams(pool, round.teams_per_group, rng)
        .iter()
        .enumerate()
        .map(|(i, teams)| {
            Group::new(
                round.id,
                format!("Group {}", i + 1),
                round.start_time,
                total_match,
                teams,
            )
        })
        .collect();
    log::info!(
        "Round {}: {} team(s) placed into {} group(s){}",
        round.id,
        pool.len(),
        groups.len(),
        if groups.len() == 1 { " (grand finale)" } else { "" }
    );
    Ok(groups)
}

/// Mark the round completed and, for a grand finale, the event too.
/// Returns true when the event was completed by this call.
pub(crate) fn complete_round(round: &mut Round, event: &mut Event) -> bool {
    round.status = Status::Completed;
    log::info!("Round {} ({}) completed", round.id, round.name);
    if round.is_grand_finale() {
        mark_completed(event);
        return true;
    }
    false
}

/// Completion check run after a group completes: completes the round once every group has.
/// Returns `(round_completed, event_completed)`.
pub(crate) fn cascade_group_completion(
    round: &mut Round,
    event: &mut Event,
    group_status: &HashMap<GroupId, Status>,
) -> (bool, bool) {
    if round.status == Status::Completed || !all_groups_completed(round, group_status) {
        return (false, false);
    }
    let event_completed = complete_round(round, event);
    (true, event_completed)
}

/// Manual status update: only `Completed` is accepted, and only once every group completed.
/// Returns true when the event was completed by this call.
pub(crate) fn confirm_round_status(
    round: &mut Round,
    event: &mut Event,
    target: Status,
    group_status: &HashMap<GroupId, Status>,
) -> Result<bool, ProgressionError> {
    if target != Status::Completed {
        return Err(ProgressionError::UnsupportedStatus(target));
    }
    if round.status == Status::Completed {
        return Ok(false);
    }
    if !all_groups_completed(round, group_status) {
        return Err(ProgressionError::RoundHasIncompleteGroups(round.id));
    }
    Ok(complete_round(round, event))
}

/// Completed rounds are permanent.
pub fn ensure_deletable(round: &Round) -> Result<(), ProgressionError> {
    if round.status == Status::Completed {
        return Err(ProgressionError::RoundCompleted(round.id));
    }
    Ok(())
}

/// The round to show by default: the first ongoing one, else the latest.
pub fn current_round<'a>(rounds: &[&'a Round]) -> Option<&'a Round> {
    let mut ordered = rounds.to_vec();
    ordered.sort_by_key(|r| r.number);
    ordered
        .iter()
        .find(|r| r.status == Status::Ongoing)
        .or_else(|| ordered.last())
        .copied()
}
