//! Lifecycle status shared by events, rounds and groups.

use serde::{Deserialize, Serialize};

/// Progress of an event, round or group. Transitions only move forward:
/// `Pending -> Ongoing -> Completed`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    Ongoing,
    Completed,
}

impl Status {
    pub fn is_completed(self) -> bool {
        self == Status::Completed
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pending => write!(f, "pending"),
            Status::Ongoing => write!(f, "ongoing"),
            Status::Completed => write!(f, "completed"),
        }
    }
}
