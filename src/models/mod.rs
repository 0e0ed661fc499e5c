//! Data structures for tournament progression: events, rounds, groups, team score ledgers.

mod error;
mod event;
mod group;
mod result;
mod round;
mod status;

pub use error::{ErrorKind, ProgressionError};
pub use event::{Event, EventId};
pub use group::{Group, GroupId, TeamId, TeamScore};
pub use result::{EntryOutcome, EntryStatus, MatchResult};
pub use round::{NewRound, Round, RoundId};
pub use status::Status;
