//! Event: the competition rounds belong to.

use crate::models::group::TeamId;
use crate::models::status::Status;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an event.
pub type EventId = Uuid;

/// An event as seen by the progression engine: its registered teams and overall progress.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    /// Registered teams; the pool for round 1.
    pub teams: Vec<TeamId>,
    pub progress: Status,
}

impl Event {
    pub fn new(name: impl Into<String>, teams: Vec<TeamId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            teams,
            progress: Status::Pending,
        }
    }
}
