//! Match result input and per-entry outcomes.

use crate::models::group::TeamId;
use serde::{Deserialize, Serialize};

/// One team's placement and kills in a finished match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub team_id: TeamId,
    pub rank: u32,
    #[serde(default)]
    pub kills: u32,
}

impl MatchResult {
    pub fn new(team_id: TeamId, rank: u32, kills: u32) -> Self {
        Self {
            team_id,
            rank,
            kills,
        }
    }
}

/// What happened to one entry of a result batch.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Applied,
    /// Team has no ledger entry in this group.
    SkippedUnknownTeam,
    /// Team already appeared earlier in the same batch.
    SkippedDuplicateTeam,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EntryOutcome {
    pub team_id: TeamId,
    pub status: EntryStatus,
}
