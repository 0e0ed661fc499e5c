//! Round: one stage of an event, split into groups.

use crate::models::event::EventId;
use crate::models::group::GroupId;
use crate::models::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a round.
pub type RoundId = Uuid;

/// Input for creating a round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewRound {
    pub name: String,
    pub start_time: DateTime<Utc>,
    /// Minutes between consecutive matches of a group.
    #[serde(default)]
    pub gap_minutes: u32,
    pub matches_per_group: u32,
    pub qualifying_teams: u32,
    /// Falls back to the engine default when absent.
    #[serde(default)]
    pub teams_per_group: Option<u32>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub event_id: EventId,
    pub name: String,
    /// 1-based, assigned at creation and never changed.
    pub number: u32,
    pub start_time: DateTime<Utc>,
    pub gap_minutes: u32,
    pub matches_per_group: u32,
    /// Teams per group that advance to the next round.
    pub qualifying_teams: u32,
    pub teams_per_group: u32,
    pub status: Status,
    /// In creation order.
    pub groups: Vec<GroupId>,
}

impl Round {
    pub fn new(event_id: EventId, number: u32, input: NewRound, teams_per_group: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            name: input.name,
            number,
            start_time: input.start_time,
            gap_minutes: input.gap_minutes,
            matches_per_group: input.matches_per_group,
            qualifying_teams: input.qualifying_teams,
            teams_per_group,
            status: Status::Pending,
            groups: Vec::new(),
        }
    }

    /// A round with exactly one group holds the whole remaining field: the last round of the event.
    pub fn is_grand_finale(&self) -> bool {
        self.groups.len() == 1
    }
}
