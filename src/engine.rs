//! Thread-safe in-memory store driving the progression cascades.
//!
//! Every group sits behind its own mutex, so submissions for one group are serialized
//! while different groups proceed in parallel. Round completion is re-derived under the
//! rounds write lock after a group completes, which gives it a consistent view of the
//! sibling groups.
//!
//! Locks are always taken in this order: rounds, groups map, single group, events.

use crate::config::EngineConfig;
use crate::logic::{
    self, GroupRules, RankingPolicy, ScoringStrategy, TotalPointsDescending, WeightedScoring,
};
use crate::models::{
    EntryOutcome, ErrorKind, Event, EventId, Group, GroupId, MatchResult, NewRound,
    ProgressionError, Round, RoundId, Status, TeamId, TeamScore,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

type GroupMap = HashMap<GroupId, Arc<Mutex<Group>>>;

/// Result of submitting one match to a group.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitOutcome {
    /// The group after the submission.
    pub group: Group,
    /// One per submitted entry, in input order.
    pub entries: Vec<EntryOutcome>,
    pub group_completed: bool,
    pub round_completed: bool,
    pub event_completed: bool,
}

/// Shared store of events, rounds and groups. Every progression operation goes through it.
pub struct Engine {
    config: EngineConfig,
    scoring: Box<dyn ScoringStrategy>,
    ranking: Box<dyn RankingPolicy>,
    rounds: RwLock<HashMap<RoundId, Round>>,
    groups: RwLock<GroupMap>,
    events: RwLock<HashMap<EventId, Event>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Engine with the standard weighting (kills x2, wins x5) and total-points ranking.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_policies(
            config,
            Box::new(WeightedScoring::default()),
            Box::new(TotalPointsDescending),
        )
    }

    pub fn with_policies(
        config: EngineConfig,
        scoring: Box<dyn ScoringStrategy>,
        ranking: Box<dyn RankingPolicy>,
    ) -> Self {
        Self {
            config,
            scoring,
            ranking,
            rounds: RwLock::new(HashMap::new()),
            groups: RwLock::new(HashMap::new()),
            events: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    // ----- events -----

    /// Store an event with its registered teams. Its progress starts `Pending`.
    /// A team listed twice is rejected.
    pub fn register_event(
        &self,
        name: impl Into<String>,
        teams: Vec<TeamId>,
    ) -> Result<Event, ProgressionError> {
        let mut seen = HashSet::new();
        if let Some(&dup) = teams.iter().find(|&&t| !seen.insert(t)) {
            return Err(ProgressionError::DuplicateTeam(dup));
        }
        let event = Event::new(name, teams);
        write(&self.events)?.insert(event.id, event.clone());
        log::info!(
            "Event {} ({}) registered with {} team(s)",
            event.id,
            event.name,
            event.teams.len()
        );
        Ok(event)
    }

    pub fn event(&self, event_id: EventId) -> Result<Event, ProgressionError> {
        read(&self.events)?
            .get(&event_id)
            .cloned()
            .ok_or(ProgressionError::EventNotFound(event_id))
    }

    // ----- rounds -----

    /// Create the next round of an event.
    pub fn create_round(
        &self,
        event_id: EventId,
        input: NewRound,
    ) -> Result<Round, ProgressionError> {
        let mut rounds = write(&self.rounds)?;
        let groups = read(&self.groups)?;
        let round = {
            let event_rounds = rounds_of(&rounds, event_id);
            let status = status_snapshot(&groups, event_rounds.iter().flat_map(|r| &r.groups))?;
            let mut events = write(&self.events)?;
            let event = events
                .get_mut(&event_id)
                .ok_or(ProgressionError::EventNotFound(event_id))?;
            logic::create_round(
                event,
                &event_rounds,
                &status,
                input,
                self.config.default_teams_per_group,
            )?
        };
        rounds.insert(round.id, round.clone());
        Ok(round)
    }

    /// Why the event cannot take another round, if it cannot.
    pub fn check_round_creation(&self, event_id: EventId) -> Result<(), ProgressionError> {
        let rounds = read(&self.rounds)?;
        let groups = read(&self.groups)?;
        let event_rounds = rounds_of(&rounds, event_id);
        let status = status_snapshot(&groups, event_rounds.iter().flat_map(|r| &r.groups))?;
        let event = self.event(event_id)?;
        logic::check_round_creation(&event, &event_rounds, &status)
    }

    /// Whether a new round may be created now. Errors only for missing events or broken locks.
    pub fn can_create_round(&self, event_id: EventId) -> Result<bool, ProgressionError> {
        match self.check_round_creation(event_id) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::Validation => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn round(&self, round_id: RoundId) -> Result<Round, ProgressionError> {
        read(&self.rounds)?
            .get(&round_id)
            .cloned()
            .ok_or(ProgressionError::RoundNotFound(round_id))
    }

    /// All rounds of an event, by number.
    pub fn rounds(&self, event_id: EventId) -> Result<Vec<Round>, ProgressionError> {
        let rounds = read(&self.rounds)?;
        let list = rounds_of(&rounds, event_id).into_iter().cloned().collect();
        Ok(list)
    }

    /// The first ongoing round of the event, else its latest.
    pub fn current_round(&self, event_id: EventId) -> Result<Option<Round>, ProgressionError> {
        let rounds = read(&self.rounds)?;
        let event_rounds = rounds_of(&rounds, event_id);
        let current = logic::current_round(&event_rounds).cloned();
        Ok(current)
    }

    /// Manual status update; only `Completed` is accepted and only once every group completed.
    pub fn update_round_status(
        &self,
        round_id: RoundId,
        target: Status,
    ) -> Result<Round, ProgressionError> {
        let mut rounds = write(&self.rounds)?;
        let groups = read(&self.groups)?;
        let round = rounds
            .get_mut(&round_id)
            .ok_or(ProgressionError::RoundNotFound(round_id))?;
        let status = status_snapshot(&groups, round.groups.iter())?;
        let mut events = write(&self.events)?;
        let event = events
            .get_mut(&round.event_id)
            .ok_or(ProgressionError::EventNotFound(round.event_id))?;
        logic::confirm_round_status(round, event, target, &status)?;
        Ok(round.clone())
    }

    /// Delete a round with its groups and their ledgers in one step. Completed rounds are kept.
    pub fn delete_round(&self, round_id: RoundId) -> Result<Round, ProgressionError> {
        let mut rounds = write(&self.rounds)?;
        let mut groups = write(&self.groups)?;
        let round = rounds
            .get(&round_id)
            .ok_or(ProgressionError::RoundNotFound(round_id))?;
        logic::ensure_deletable(round)?;

        for id in &round.groups {
            groups.remove(id);
        }
        let removed = rounds
            .remove(&round_id)
            .ok_or(ProgressionError::RoundNotFound(round_id))?;
        log::info!(
            "Round {} ({}) deleted with {} group(s)",
            removed.id,
            removed.name,
            removed.groups.len()
        );
        Ok(removed)
    }

    // ----- groups -----

    /// Create the groups of a pending round, distributing the team pool at random.
    pub fn create_groups(&self, round_id: RoundId) -> Result<Vec<Group>, ProgressionError> {
        self.create_groups_with(round_id, &mut rand::thread_rng())
    }

    /// Same as [`Engine::create_groups`] with a caller-supplied random source.
    pub fn create_groups_with<R: Rng + ?Sized>(
        &self,
        round_id: RoundId,
        rng: &mut R,
    ) -> Result<Vec<Group>, ProgressionError> {
        let mut rounds = write(&self.rounds)?;
        let mut groups = write(&self.groups)?;
        let created = {
            let round = rounds
                .get(&round_id)
                .ok_or(ProgressionError::RoundNotFound(round_id))?;
            let event_rounds = rounds_of(&rounds, round.event_id);
            let previous = logic::previous_round(round, &event_rounds);
            let previous_groups = match previous {
                Some(prev) => group_snapshot(&groups, prev.groups.iter())?,
                None => HashMap::new(),
            };
            let event = self.event(round.event_id)?;
            let pool = logic::team_pool(&event, previous, &previous_groups)?;
            logic::seed_groups(round, &pool, self.config.default_total_match, rng)?
        };

        let round = rounds
            .get_mut(&round_id)
            .ok_or(ProgressionError::RoundNotFound(round_id))?;
        round.groups = created.iter().map(|g| g.id).collect();
        round.status = Status::Ongoing;
        for group in &created {
            groups.insert(group.id, Arc::new(Mutex::new(group.clone())));
        }
        Ok(created)
    }

    pub fn group(&self, group_id: GroupId) -> Result<Group, ProgressionError> {
        let groups = read(&self.groups)?;
        let group = groups
            .get(&group_id)
            .ok_or(ProgressionError::GroupNotFound(group_id))?;
        let snapshot = lock(group)?.clone();
        Ok(snapshot)
    }

    /// Groups of a round in creation order.
    pub fn groups(&self, round_id: RoundId) -> Result<Vec<Group>, ProgressionError> {
        let round = self.round(round_id)?;
        let groups = read(&self.groups)?;
        let mut snapshot = group_snapshot(&groups, round.groups.iter())?;
        Ok(round
            .groups
            .iter()
            .filter_map(|id| snapshot.remove(id))
            .collect())
    }

    /// Ledger entries ranked best-first.
    pub fn standings(&self, group_id: GroupId) -> Result<Vec<TeamScore>, ProgressionError> {
        let group = self.group(group_id)?;
        let ranked = logic::standings(&group, self.ranking.as_ref())
            .into_iter()
            .cloned()
            .collect();
        Ok(ranked)
    }

    /// Start time of every match in the group.
    pub fn match_schedule(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<DateTime<Utc>>, ProgressionError> {
        let group = self.group(group_id)?;
        let round = self.round(group.round_id)?;
        let total = group.effective_total_match(Some(round.matches_per_group));
        group.match_schedule(total, round.gap_minutes)
    }

    /// Record one finished match for a group, then run the group, round and event cascades.
    ///
    /// `event_id` is carried for log context only.
    pub fn submit_match_results(
        &self,
        group_id: GroupId,
        event_id: Option<EventId>,
        results: &[MatchResult],
    ) -> Result<SubmitOutcome, ProgressionError> {
        let round_id = self.group(group_id)?.round_id;
        let rules = GroupRules::from_round(&self.round(round_id)?);

        let (entries, group) = {
            let groups = read(&self.groups)?;
            let slot = groups
                .get(&group_id)
                .ok_or(ProgressionError::GroupNotFound(group_id))?;
            let mut group = lock(slot)?;
            let entries = logic::submit_match_results(
                &mut group,
                rules,
                results,
                self.scoring.as_ref(),
                self.ranking.as_ref(),
            )?;
            (entries, group.clone())
        };
        log::debug!(
            "Group {} (event {:?}): match {} recorded, status {}",
            group_id,
            event_id,
            group.matches_played,
            group.status
        );

        let group_completed = group.status == Status::Completed;
        let (round_completed, event_completed) = if group_completed {
            self.complete_round_if_done(round_id)?
        } else {
            (false, false)
        };
        Ok(SubmitOutcome {
            group,
            entries,
            group_completed,
            round_completed,
            event_completed,
        })
    }

    /// Re-derive round completion from the current status of every group in the round.
    fn complete_round_if_done(&self, round_id: RoundId) -> Result<(bool, bool), ProgressionError> {
        let mut rounds = write(&self.rounds)?;
        let groups = read(&self.groups)?;
        let Some(round) = rounds.get_mut(&round_id) else {
            log::warn!("Round {} disappeared before its completion check", round_id);
            return Ok((false, false));
        };
        let status = status_snapshot(&groups, round.groups.iter())?;
        let mut events = write(&self.events)?;
        let event = events
            .get_mut(&round.event_id)
            .ok_or(ProgressionError::EventNotFound(round.event_id))?;
        Ok(logic::cascade_group_completion(round, event, &status))
    }
}

fn poisoned<T>(_: T) -> ProgressionError {
    log::error!("lock poisoned");
    ProgressionError::LockPoisoned
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, ProgressionError> {
    lock.read().map_err(poisoned)
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, ProgressionError> {
    lock.write().map_err(poisoned)
}

fn lock(group: &Mutex<Group>) -> Result<MutexGuard<'_, Group>, ProgressionError> {
    group.lock().map_err(poisoned)
}

/// Rounds of one event, by number.
fn rounds_of(rounds: &HashMap<RoundId, Round>, event_id: EventId) -> Vec<&Round> {
    let mut list: Vec<&Round> = rounds.values().filter(|r| r.event_id == event_id).collect();
    list.sort_by_key(|r| r.number);
    list
}

fn status_snapshot<'a>(
    groups: &GroupMap,
    ids: impl Iterator<Item = &'a GroupId>,
) -> Result<HashMap<GroupId, Status>, ProgressionError> {
    let mut status = HashMap::new();
    for id in ids {
        if let Some(group) = groups.get(id) {
            status.insert(*id, lock(group)?.status);
        }
    }
    Ok(status)
}

fn group_snapshot<'a>(
    groups: &GroupMap,
    ids: impl Iterator<Item = &'a GroupId>,
) -> Result<HashMap<GroupId, Group>, ProgressionError> {
    let mut snapshot = HashMap::new();
    for id in ids {
        if let Some(group) = groups.get(id) {
            snapshot.insert(*id, lock(group)?.clone());
        }
    }
    Ok(snapshot)
}
