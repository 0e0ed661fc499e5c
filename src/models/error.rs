//! Errors raised by progression operations.

use crate::models::event::EventId;
use crate::models::group::{GroupId, TeamId};
use crate::models::round::RoundId;
use crate::models::status::Status;

/// How the caller should treat an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Caller-correctable input or sequencing problem.
    Validation,
    /// A referenced record does not exist.
    NotFound,
    /// Internal state broke an invariant. Never expected under correct sequencing.
    Consistency,
}

/// Errors that can occur during progression operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProgressionError {
    EventNotFound(EventId),
    RoundNotFound(RoundId),
    GroupNotFound(GroupId),
    /// Round name is empty.
    EmptyRoundName,
    /// A round configuration value that must be at least 1 was 0.
    InvalidRoundConfig(&'static str),
    /// A round configuration value above its allowed maximum.
    RoundConfigTooLarge { field: &'static str, max: u32 },
    /// The same team appears more than once in a team list.
    DuplicateTeam(TeamId),
    /// An ongoing round still has incomplete groups (or none at all).
    RoundInProgress(RoundId),
    /// The latest round was a grand finale; the event takes no further rounds.
    GrandFinaleReached(EventId),
    /// The event already finished.
    EventCompleted(EventId),
    /// Results submitted to a group that already completed.
    GroupAlreadyCompleted(GroupId),
    /// A result batch with no entries.
    EmptyResults,
    /// Applying the batch would overflow a team's counters.
    ScoreOverflow(TeamId),
    /// A group's match times fall outside the representable date range.
    ScheduleOutOfRange(GroupId),
    /// Groups were already created for this round.
    GroupsAlreadyCreated(RoundId),
    /// No teams available to place into groups.
    NoTeamsAvailable(RoundId),
    /// The previous round has not completed, so its qualifiers are unknown.
    PreviousRoundIncomplete(RoundId),
    /// Only `completed` can be set through a manual status update.
    UnsupportedStatus(Status),
    /// Manual completion requested while some groups are still open.
    RoundHasIncompleteGroups(RoundId),
    /// Completed rounds cannot be deleted.
    RoundCompleted(RoundId),
    /// Group has played more matches than it is configured for.
    MatchesExceeded { group: GroupId, played: u32, total: u32 },
    /// Qualification requested on a group that has not completed.
    QualificationBeforeCompletion(GroupId),
    /// A lock was poisoned by a panicking writer.
    LockPoisoned,
}

impl ProgressionError {
    pub fn kind(&self) -> ErrorKind {
        use ProgressionError::*;
        match self {
            EventNotFound(_) | RoundNotFound(_) | GroupNotFound(_) => ErrorKind::NotFound,
            MatchesExceeded { .. } | QualificationBeforeCompletion(_) | LockPoisoned => {
                ErrorKind::Consistency
            }
            _ => ErrorKind::Validation,
        }
    }
}

impl std::fmt::Display for ProgressionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ProgressionError::*;
        match self {
            EventNotFound(id) => write!(f, "Event {} not found", id),
            RoundNotFound(id) => write!(f, "Round {} not found", id),
            GroupNotFound(id) => write!(f, "Group {} not found", id),
            EmptyRoundName => write!(f, "Round name must not be empty"),
            InvalidRoundConfig(field) => write!(f, "{} must be at least 1", field),
            RoundConfigTooLarge { field, max } => write!(f, "{} must be at most {}", field, max),
            DuplicateTeam(id) => write!(f, "Team {} is listed more than once", id),
            RoundInProgress(_) => {
                write!(f, "An ongoing round still has incomplete groups")
            }
            GrandFinaleReached(_) => {
                write!(f, "The grand finale has been created; no further rounds allowed")
            }
            EventCompleted(_) => write!(f, "Event already completed"),
            GroupAlreadyCompleted(_) => write!(f, "Group already completed"),
            EmptyResults => write!(f, "Match results must contain at least one team"),
            ScoreOverflow(id) => write!(f, "Score for team {} is out of range", id),
            ScheduleOutOfRange(id) => write!(f, "Match schedule of group {} is out of range", id),
            GroupsAlreadyCreated(_) => write!(f, "Groups already created for this round"),
            NoTeamsAvailable(_) => write!(f, "No teams available for this round"),
            PreviousRoundIncomplete(_) => write!(f, "Previous round is not completed"),
            UnsupportedStatus(status) => {
                write!(f, "Round status cannot be set to {}", status)
            }
            RoundHasIncompleteGroups(_) => {
                write!(f, "All groups must be completed before completing the round")
            }
            RoundCompleted(_) => write!(f, "Completed rounds cannot be deleted"),
            MatchesExceeded { group, played, total } => write!(
                f,
                "Group {} played {} matches but is configured for {}",
                group, played, total
            ),
            QualificationBeforeCompletion(id) => {
                write!(f, "Qualification computed on incomplete group {}", id)
            }
            LockPoisoned => write!(f, "lock error"),
        }
    }
}

impl std::error::Error for ProgressionError {}
