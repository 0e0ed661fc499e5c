//! Esports tournament progression: library with models, progression rules and a thread-safe engine.

pub mod config;
pub mod engine;
pub mod logic;
pub mod models;

pub use config::{EngineConfig, ServerConfig};
pub use engine::{Engine, SubmitOutcome};
pub use logic::{
    placement_points, RankingPolicy, ScoringStrategy, TotalPointsDescending, WeightedScoring,
};
pub use models::{
    EntryOutcome, EntryStatus, ErrorKind, Event, EventId, Group, GroupId, MatchResult, NewRound,
    ProgressionError, Round, RoundId, Status, TeamId, TeamScore,
};
