//! Integration tests for round and event progression through the engine.

use chrono::{TimeZone, Utc};
use esports_progression::logic::{check_round_creation, current_round, distribute_teams};
use esports_progression::{
    Engine, ErrorKind, Event, Group, MatchResult, NewRound, ProgressionError, Round, Status,
    TeamId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use uuid::Uuid;

fn teams(n: usize) -> Vec<TeamId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

fn new_round(matches: u32, qualifying: u32, per_group: Option<u32>) -> NewRound {
    NewRound {
        name: "Qualifiers".to_string(),
        start_time: Utc.with_ymd_and_hms(2026, 5, 2, 17, 0, 0).unwrap(),
        gap_minutes: 30,
        matches_per_group: matches,
        qualifying_teams: qualifying,
        teams_per_group: per_group,
    }
}

/// One match where teams finish in ledger order.
fn play_match(engine: &Engine, group: &Group) -> esports_progression::SubmitOutcome {
    let batch: Vec<MatchResult> = group
        .teams()
        .iter()
        .enumerate()
        .map(|(i, &team)| MatchResult::new(team, i as u32 + 1, 0))
        .collect();
    engine
        .submit_match_results(group.id, None, &batch)
        .unwrap()
}

#[test]
fn rounds_are_numbered_in_creation_order_and_start_the_event() {
    let engine = Engine::default();
    let event = engine.register_event("Spring Cup", teams(4)).unwrap();
    assert_eq!(event.progress, Status::Pending);

    let r1 = engine.create_round(event.id, new_round(1, 1, Some(2))).unwrap();
    assert_eq!(r1.number, 1);
    assert_eq!(r1.status, Status::Pending);
    assert_eq!(engine.event(event.id).unwrap().progress, Status::Ongoing);

    for g in engine.create_groups(r1.id).unwrap() {
        play_match(&engine, &g);
    }
    let r2 = engine.create_round(event.id, new_round(1, 1, Some(2))).unwrap();
    assert_eq!(r2.number, 2);
}

#[test]
fn invalid_round_config_is_rejected() {
    let engine = Engine::default();
    let event = engine.register_event("Spring Cup", teams(4)).unwrap();

    let err = engine.create_round(event.id, new_round(0, 1, None)).unwrap_err();
    assert_eq!(err, ProgressionError::InvalidRoundConfig("matches_per_group"));
    let err = engine.create_round(event.id, new_round(1, 0, None)).unwrap_err();
    assert_eq!(err, ProgressionError::InvalidRoundConfig("qualifying_teams"));
    let mut unnamed = new_round(1, 1, None);
    unnamed.name = "  ".to_string();
    assert_eq!(
        engine.create_round(event.id, unnamed).unwrap_err(),
        ProgressionError::EmptyRoundName
    );
    assert!(engine.rounds(event.id).unwrap().is_empty());
}

#[test]
fn groups_get_zeroed_ledgers_and_even_sizes() {
    let engine = Engine::default();
    let pool = teams(10);
    let event = engine.register_event("Spring Cup", pool.clone()).unwrap();
    let round = engine.create_round(event.id, new_round(3, 2, Some(4))).unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    let groups = engine.create_groups_with(round.id, &mut rng).unwrap();
    let mut sizes: Vec<usize> = groups.iter().map(|g| g.leaderboard.len()).collect();
    sizes.sort();
    assert_eq!(sizes, vec![3, 3, 4]);

    let mut placed: Vec<TeamId> = groups.iter().flat_map(|g| g.teams()).collect();
    placed.sort();
    let mut expected = pool;
    expected.sort();
    assert_eq!(placed, expected);

    for g in &groups {
        assert_eq!(g.total_match, 3);
        assert_eq!(g.status, Status::Pending);
        assert!(g.leaderboard.iter().all(|e| e.matches_played == 0 && e.total_points == 0));
    }
    let round = engine.round(round.id).unwrap();
    assert_eq!(round.status, Status::Ongoing);
    assert_eq!(round.groups.len(), 3);
    assert_eq!(
        engine.create_groups(round.id).unwrap_err(),
        ProgressionError::GroupsAlreadyCreated(round.id)
    );
}

#[test]
fn distribute_teams_keeps_sizes_within_one() {
    let pool = teams(17);
    let mut rng = StdRng::seed_from_u64(1);
    let split = distribute_teams(&pool, 5, &mut rng);
    assert_eq!(split.len(), 4);
    assert!(split.iter().all(|g| g.len() == 4 || g.len() == 5));
    assert!(distribute_teams(&[], 5, &mut rng).is_empty());
}

#[test]
fn round_completes_only_after_every_group() {
    let engine = Engine::default();
    let event = engine.register_event("Spring Cup", teams(4)).unwrap();
    let round = engine.create_round(event.id, new_round(2, 1, Some(2))).unwrap();
    let groups = engine.create_groups(round.id).unwrap();
    assert_eq!(groups.len(), 2);

    play_match(&engine, &groups[0]);
    let outcome = play_match(&engine, &groups[0]);
    assert!(outcome.group_completed);
    assert!(!outcome.round_completed);
    assert_eq!(engine.round(round.id).unwrap().status, Status::Ongoing);

    play_match(&engine, &groups[1]);
    assert_eq!(engine.round(round.id).unwrap().status, Status::Ongoing);
    let outcome = play_match(&engine, &groups[1]);
    assert!(outcome.round_completed);
    assert!(!outcome.event_completed);
    assert_eq!(engine.round(round.id).unwrap().status, Status::Completed);
    assert_eq!(engine.event(event.id).unwrap().progress, Status::Ongoing);
}

#[test]
fn grand_finale_completes_event_and_closes_it() {
    let engine = Engine::default();
    let event = engine.register_event("Grand Final", teams(3)).unwrap();
    let round = engine.create_round(event.id, new_round(2, 2, None)).unwrap();
    let groups = engine.create_groups(round.id).unwrap();
    assert_eq!(groups.len(), 1);
    assert!(!engine.can_create_round(event.id).unwrap());

    play_match(&engine, &groups[0]);
    let outcome = play_match(&engine, &groups[0]);
    assert!(outcome.group_completed);
    assert!(outcome.round_completed);
    assert!(outcome.event_completed);
    assert_eq!(engine.event(event.id).unwrap().progress, Status::Completed);

    assert!(!engine.can_create_round(event.id).unwrap());
    let err = engine.create_round(event.id, new_round(1, 1, None)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn creation_waits_for_every_group_of_the_ongoing_round() {
    let engine = Engine::default();
    let event = engine.register_event("Spring Cup", teams(4)).unwrap();
    let r1 = engine.create_round(event.id, new_round(1, 1, Some(2))).unwrap();

    // Created but not seeded yet.
    assert_eq!(
        engine.create_round(event.id, new_round(1, 1, Some(2))).unwrap_err(),
        ProgressionError::RoundInProgress(r1.id)
    );

    let groups = engine.create_groups(r1.id).unwrap();
    play_match(&engine, &groups[0]);
    assert!(!engine.can_create_round(event.id).unwrap());
    assert_eq!(
        engine.create_round(event.id, new_round(1, 1, Some(2))).unwrap_err(),
        ProgressionError::RoundInProgress(r1.id)
    );

    play_match(&engine, &groups[1]);
    assert!(engine.can_create_round(event.id).unwrap());

    // Round 2 is seeded from the qualifiers: one per group, so a single final group.
    let r2 = engine.create_round(event.id, new_round(1, 1, Some(2))).unwrap();
    let finals = engine.create_groups(r2.id).unwrap();
    assert_eq!(finals.len(), 1);
    let mut finalists = finals[0].teams();
    finalists.sort();
    let mut qualified: Vec<TeamId> = groups
        .iter()
        .flat_map(|g| engine.group(g.id).unwrap().qualified_teams())
        .collect();
    qualified.sort();
    assert_eq!(finalists, qualified);
    assert_eq!(finalists.len(), 2);
}

#[test]
fn ongoing_round_with_all_groups_completed_does_not_block() {
    let event = Event::new("Spring Cup", teams(4));
    let (g1, g2) = (Uuid::new_v4(), Uuid::new_v4());
    let mut round = Round::new(event.id, 1, new_round(1, 1, Some(2)), 2);
    round.status = Status::Ongoing;
    round.groups = vec![g1, g2];

    let mut status = HashMap::from([(g1, Status::Completed), (g2, Status::Ongoing)]);
    assert_eq!(
        check_round_creation(&event, &[&round], &status),
        Err(ProgressionError::RoundInProgress(round.id))
    );
    status.insert(g2, Status::Completed);
    assert_eq!(check_round_creation(&event, &[&round], &status), Ok(()));

    round.groups = vec![g1];
    assert_eq!(
        check_round_creation(&event, &[&round], &status),
        Err(ProgressionError::GrandFinaleReached(event.id))
    );
}

#[test]
fn manual_status_update_only_completes_finished_rounds() {
    let engine = Engine::default();
    let event = engine.register_event("Spring Cup", teams(4)).unwrap();
    let round = engine.create_round(event.id, new_round(1, 1, Some(2))).unwrap();

    assert_eq!(
        engine.update_round_status(round.id, Status::Ongoing).unwrap_err(),
        ProgressionError::UnsupportedStatus(Status::Ongoing)
    );
    assert_eq!(
        engine.update_round_status(round.id, Status::Completed).unwrap_err(),
        ProgressionError::RoundHasIncompleteGroups(round.id)
    );

    for g in engine.create_groups(round.id).unwrap() {
        play_match(&engine, &g);
    }
    let confirmed = engine.update_round_status(round.id, Status::Completed).unwrap();
    assert_eq!(confirmed.status, Status::Completed);
}

#[test]
fn deleting_a_round_removes_its_groups() {
    let engine = Engine::default();
    let event = engine.register_event("Spring Cup", teams(6)).unwrap();
    let round = engine.create_round(event.id, new_round(2, 1, Some(3))).unwrap();
    let groups = engine.create_groups(round.id).unwrap();
    play_match(&engine, &groups[0]);

    let removed = engine.delete_round(round.id).unwrap();
    assert_eq!(removed.groups.len(), 2);
    for g in &groups {
        assert_eq!(
            engine.group(g.id).unwrap_err(),
            ProgressionError::GroupNotFound(g.id)
        );
    }
    assert_eq!(
        engine.round(round.id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert!(engine.can_create_round(event.id).unwrap());
}

#[test]
fn completed_rounds_cannot_be_deleted() {
    let engine = Engine::default();
    let event = engine.register_event("Spring Cup", teams(4)).unwrap();
    let round = engine.create_round(event.id, new_round(1, 1, Some(2))).unwrap();
    for g in engine.create_groups(round.id).unwrap() {
        play_match(&engine, &g);
    }
    assert_eq!(
        engine.delete_round(round.id).unwrap_err(),
        ProgressionError::RoundCompleted(round.id)
    );
    assert_eq!(engine.groups(round.id).unwrap().len(), 2);
}

#[test]
fn current_round_prefers_ongoing_then_latest() {
    let event = Event::new("Spring Cup", teams(8));
    let mut r1 = Round::new(event.id, 1, new_round(1, 1, None), 4);
    let mut r2 = Round::new(event.id, 2, new_round(1, 1, None), 4);
    assert!(current_round(&[]).is_none());

    r1.status = Status::Ongoing;
    assert_eq!(current_round(&[&r2, &r1]).map(|r| r.id), Some(r1.id));

    r1.status = Status::Completed;
    r2.status = Status::Pending;
    assert_eq!(current_round(&[&r2, &r1]).map(|r| r.id), Some(r2.id));
}

#[test]
fn unknown_records_are_not_found() {
    let engine = Engine::default();
    let missing = Uuid::new_v4();
    assert_eq!(
        engine.can_create_round(missing).unwrap_err(),
        ProgressionError::EventNotFound(missing)
    );
    let err = engine
        .submit_match_results(missing, None, &[MatchResult::new(missing, 1, 0)])
        .unwrap_err();
    assert_eq!(err, ProgressionError::GroupNotFound(missing));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn event_without_teams_cannot_seed_groups() {
    let engine = Engine::default();
    let event = engine.register_event("Empty Cup", Vec::new()).unwrap();
    let round = engine.create_round(event.id, new_round(1, 1, None)).unwrap();
    assert_eq!(
        engine.create_groups(round.id).unwrap_err(),
        ProgressionError::NoTeamsAvailable(round.id)
    );
}

#[test]
fn event_listing_a_team_twice_is_rejected() {
    let engine = Engine::default();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let err = engine.register_event("Spring Cup", vec![a, a, b]).unwrap_err();
    assert_eq!(err, ProgressionError::DuplicateTeam(a));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn oversized_match_count_is_rejected() {
    let engine = Engine::default();
    let event = engine.register_event("Spring Cup", teams(4)).unwrap();
    let err = engine
        .create_round(event.id, new_round(10_000, 1, Some(2)))
        .unwrap_err();
    assert_eq!(
        err,
        ProgressionError::RoundConfigTooLarge {
            field: "matches_per_group",
            max: esports_progression::logic::MAX_MATCHES_PER_GROUP,
        }
    );
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(engine.rounds(event.id).unwrap().is_empty());
}

#[test]
fn schedule_with_huge_gap_is_an_error_not_a_crash() {
    let engine = Engine::default();
    let event = engine.register_event("Spring Cup", teams(2)).unwrap();
    let mut input = new_round(100, 1, Some(2));
    input.gap_minutes = u32::MAX;
    let round = engine.create_round(event.id, input).unwrap();
    let group = engine.create_groups(round.id).unwrap().remove(0);

    assert_eq!(
        engine.match_schedule(group.id),
        Err(ProgressionError::ScheduleOutOfRange(group.id))
    );
    assert_eq!(engine.group(group.id).unwrap(), group);
}

#[test]
fn overflowing_submission_keeps_the_engine_usable() {
    let engine = Engine::default();
    let event = engine.register_event("Spring Cup", teams(4)).unwrap();
    let round = engine.create_round(event.id, new_round(1, 1, Some(2))).unwrap();
    let groups = engine.create_groups(round.id).unwrap();
    let target = &groups[0];
    let t = target.teams();

    let err = engine
        .submit_match_results(
            target.id,
            Some(event.id),
            &[MatchResult::new(t[0], 1, u32::MAX), MatchResult::new(t[1], 2, 0)],
        )
        .unwrap_err();
    assert_eq!(err, ProgressionError::ScoreOverflow(t[0]));
    assert_eq!(engine.group(target.id).unwrap(), *target);
    assert!(!engine.can_create_round(event.id).unwrap());

    for g in &groups {
        assert!(play_match(&engine, g).group_completed);
    }
    assert_eq!(engine.round(round.id).unwrap().status, Status::Completed);
    assert!(engine.can_create_round(event.id).unwrap());
}
