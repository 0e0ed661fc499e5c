//! Engine defaults and server settings, read from the environment.

use std::env;

/// Fallbacks used when a round does not say otherwise.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    /// Matches a group plays when neither its round nor the group defines a count.
    pub default_total_match: u32,
    /// Group size for rounds created without `teams_per_group`.
    pub default_teams_per_group: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_total_match: 1,
            default_teams_per_group: 16,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `DEFAULT_TOTAL_MATCH` and `DEFAULT_TEAMS_PER_GROUP`.
    /// Unparsable or zero values are ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_total_match: env_positive("DEFAULT_TOTAL_MATCH")
                .unwrap_or(defaults.default_total_match),
            default_teams_per_group: env_positive("DEFAULT_TEAMS_PER_GROUP")
                .unwrap_or(defaults.default_teams_per_group),
        }
    }
}

/// Where the web adapter listens.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `HOST` and `PORT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_value("HOST").unwrap_or(defaults.host),
            port: env_value("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_positive(key: &str) -> Option<u32> {
    env_value(key)
        .and_then(|value| value.parse().ok())
        .filter(|&n| n > 0)
}
