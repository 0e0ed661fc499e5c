//! Group and its team score ledger.

use crate::models::error::ProgressionError;
use crate::models::round::RoundId;
use crate::models::status::Status;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Unique identifier for a group.
pub type GroupId = Uuid;

/// Teams are owned by the registration side; here they are only referenced.
pub type TeamId = Uuid;

/// One team's cumulative record within a group.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamScore {
    pub team_id: TeamId,
    /// Sum of placement points.
    pub score: u32,
    pub kills: u32,
    /// Matches finished in first place.
    pub wins: u32,
    pub matches_played: u32,
    /// Placement in the most recent match only.
    pub position: u32,
    /// Derived from the other counters by the scoring strategy; never set directly.
    pub total_points: u32,
    /// Set when the group completes.
    pub is_qualified: bool,
}

impl TeamScore {
    /// Zeroed entry for a team joining a group.
    pub fn new(team_id: TeamId) -> Self {
        Self {
            team_id,
            ..Self::default()
        }
    }

    /// Add one match to the cumulative counters. On overflow nothing changes.
    pub fn record_match(
        &mut self,
        rank: u32,
        placement_points: u32,
        kills: u32,
    ) -> Result<(), ProgressionError> {
        let team_id = self.team_id;
        let overflow = || ProgressionError::ScoreOverflow(team_id);
        let score = self.score.checked_add(placement_points).ok_or_else(overflow)?;
        let total_kills = self.kills.checked_add(kills).ok_or_else(overflow)?;
        let wins = self
            .wins
            .checked_add(u32::from(rank == 1))
            .ok_or_else(overflow)?;
        let matches_played = self.matches_played.checked_add(1).ok_or_else(overflow)?;

        self.score = score;
        self.kills = total_kills;
        self.wins = wins;
        self.matches_played = matches_played;
        self.position = rank;
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub round_id: RoundId,
    pub name: String,
    /// Scheduled start of the first match.
    pub match_time: DateTime<Utc>,
    /// Own match count, used only when the round does not define one.
    pub total_match: u32,
    pub matches_played: u32,
    pub status: Status,
    /// One entry per participating team, in creation order.
    pub leaderboard: Vec<TeamScore>,
}

impl Group {
    /// Repeated team ids get a single ledger entry.
    pub fn new(
        round_id: RoundId,
        name: impl Into<String>,
        match_time: DateTime<Utc>,
        total_match: u32,
        teams: &[TeamId],
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            round_id,
            name: name.into(),
            match_time,
            total_match,
            matches_played: 0,
            status: Status::Pending,
            leaderboard: {
                let mut seen = HashSet::new();
                teams
                    .iter()
                    .copied()
                    .filter(|&t| seen.insert(t))
                    .map(TeamScore::new)
                    .collect()
            },
        }
    }

    /// Participating teams in ledger order.
    pub fn teams(&self) -> Vec<TeamId> {
        self.leaderboard.iter().map(|e| e.team_id).collect()
    }

    pub fn entry(&self, team_id: TeamId) -> Option<&TeamScore> {
        self.leaderboard.iter().find(|e| e.team_id == team_id)
    }

    /// Matches this group must play: the round's count when it defines one,
    /// else the group's own, else 1.
    pub fn effective_total_match(&self, round_matches: Option<u32>) -> u32 {
        round_matches
            .filter(|&n| n > 0)
            .unwrap_or(self.total_match)
            .max(1)
    }

    /// Teams flagged as qualified, in ledger order.
    pub fn qualified_teams(&self) -> Vec<TeamId> {
        self.leaderboard
            .iter()
            .filter(|e| e.is_qualified)
            .map(|e| e.team_id)
            .collect()
    }

    /// Start time of every match, `gap_minutes` apart.
    pub fn match_schedule(
        &self,
        total_match: u32,
        gap_minutes: u32,
    ) -> Result<Vec<DateTime<Utc>>, ProgressionError> {
        (0..total_match)
            .map(|k| {
                i64::from(k)
                    .checked_mul(i64::from(gap_minutes))
                    .and_then(TimeDelta::try_minutes)
                    .and_then(|offset| self.match_time.checked_add_signed(offset))
                    .ok_or(ProgressionError::ScheduleOutOfRange(self.id))
            })
            .collect()
    }
}
