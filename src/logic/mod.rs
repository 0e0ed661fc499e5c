//! Progression rules: point table, ledger updates, group play, round and event cascades.

mod event;
mod group_play;
mod ledger;
mod points;
mod rounds;

pub use group_play::{qualify, standings, submit_match_results, GroupRules};
pub use ledger::{apply_match_results, refresh_totals};
pub use points::{
    placement_points, RankingPolicy, ScoringStrategy, TotalPointsDescending, WeightedScoring,
};
pub use rounds::{
    all_groups_completed, check_round_creation, create_round, current_round, distribute_teams,
    ensure_deletable, previous_round, seed_groups, team_pool, validate_new_round,
    MAX_MATCHES_PER_GROUP,
};
pub(crate) use rounds::{cascade_group_completion, confirm_round_status};
