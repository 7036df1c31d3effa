//! Environment-driven server configuration.
//!
//! # Invariants
//! - Every variable has a default; only malformed values fail startup.
//! - `HABITS_LOG_DIR`, when set, must be an absolute path (checked by logging init).

use habit_core::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const ENV_BIND_ADDR: &str = "HABITS_BIND_ADDR";
pub const ENV_DB_PATH: &str = "HABITS_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "HABITS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "HABITS_LOG_DIR";
pub const ENV_CORS: &str = "HABITS_CORS";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3333";
const DEFAULT_DB_PATH: &str = "habits.sqlite3";
const IN_MEMORY_DB: &str = ":memory:";

/// Where the SQLite store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db: DbLocation,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub cors: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                name,
                value,
                reason,
            } => write!(f, "invalid {name}=`{value}`: {reason}"),
        }
    }
}

impl Error for ConfigError {}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_raw = read(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                name: ENV_BIND_ADDR,
                value: bind_raw.clone(),
                reason: "expected host:port socket address",
            })?;

        let db = match read(ENV_DB_PATH) {
            Some(path) if path == IN_MEMORY_DB => DbLocation::Memory,
            Some(path) => DbLocation::File(PathBuf::from(path)),
            None => DbLocation::File(PathBuf::from(DEFAULT_DB_PATH)),
        };

        let cors = match read(ENV_CORS) {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue {
                name: ENV_CORS,
                value,
                reason: "expected true|false|1|0|yes|no",
            })?,
            None => true,
        };

        Ok(Self {
            bind_addr,
            db,
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR),
            cors,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
