//! Server configuration read from the environment.

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use questboard_sync::render_loop::DEFAULT_MAX_RERENDERS;

use crate::error::AppError;

/// Quests shown when `QUEST_BOARD_QUESTS` is not set.
pub const DEFAULT_QUESTS: [&str; 3] = [
    "Echoes of the Forgotten Realm",
    "The Ashen King's Bargain",
    "The Clockwork Gambit",
];

/// Runtime configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Quest names displayed on every board.
    pub quests: Vec<String>,
    /// Simulated latency of the reward lookup.
    pub handler_latency: Duration,
    /// Cap on consecutive re-renders when driving a source.
    pub max_rerenders: usize,
    /// Sessions idle for longer than this are discarded.
    pub session_idle_timeout: Duration,
    /// Fixed seed for the reward RNG, if reproducible rewards are wanted.
    pub rng_seed: Option<u64>,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults for
    /// unset variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let quests = match lookup("QUEST_BOARD_QUESTS") {
            Some(raw) => {
                let quests: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|quest| !quest.is_empty())
                    .map(str::to_owned)
                    .collect();
                if quests.is_empty() {
                    return Err(AppError::Config(
                        "QUEST_BOARD_QUESTS must name at least one quest".to_owned(),
                    ));
                }
                quests
            }
            None => DEFAULT_QUESTS.iter().map(|quest| (*quest).to_owned()).collect(),
        };

        let rng_seed = lookup("QUEST_BOARD_RNG_SEED")
            .map(|raw| parse("QUEST_BOARD_RNG_SEED", &raw))
            .transpose()?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse_or(&lookup, "PORT", 3000)?,
            quests,
            handler_latency: Duration::from_millis(parse_or(
                &lookup,
                "QUEST_BOARD_HANDLER_LATENCY_MS",
                1000,
            )?),
            max_rerenders: parse_or(&lookup, "QUEST_BOARD_MAX_RERENDERS", DEFAULT_MAX_RERENDERS)?,
            session_idle_timeout: Duration::from_secs(parse_or(
                &lookup,
                "QUEST_BOARD_SESSION_IDLE_SECS",
                1800,
            )?),
            rng_seed,
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a valid address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse<T>(name: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{name} is invalid: {e}")))
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    lookup(name).map_or(Ok(default), |raw| parse(name, &raw))
}
