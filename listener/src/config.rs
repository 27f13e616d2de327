//! Environment-variable configuration loading (§6 of the design).
//!
//! Every required variable that is missing, or every value that fails to
//! parse, is a fatal startup error: logged and the process exits non-zero
//! before the listener binds. This is the one place in the service that is
//! allowed to fail fast rather than propagate a `Result` up a call chain.

use {
    anyhow::Context,
    std::{collections::HashMap, path::PathBuf},
    validator_monitoring_core::types::Network,
};

const DEFAULT_API_PORT: u16 = 8080;
const DEFAULT_LOG_LEVEL: &str = "INFO";
const DEFAULT_MAX_ENTRIES_PER_BSON: u32 = 30;

pub struct Config {
    pub api_port: u16,
    pub log_level: LogLevel,
    pub mongo_db_uri: String,
    pub beacon_urls: HashMap<Network, String>,
    pub max_entries_per_bson: u32,
    pub jwt_users_file_path: PathBuf,
}

/// The five levels the design names. `Fatal` has no runtime use below
/// startup: it maps to `env_logger`'s `Error` filter plus an explicit
/// `std::process::exit` on the one startup condition that needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            other => anyhow::bail!("unrecognised LOG_LEVEL '{other}'"),
        }
    }

    pub fn as_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error | LogLevel::Fatal => log::LevelFilter::Error,
        }
    }
}

fn require_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("missing required environment variable {name}"))
}

fn env_or(name: &str, default: impl Into<String>) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_port: u16 = env_or("API_PORT", DEFAULT_API_PORT.to_string())
            .parse()
            .context("API_PORT is not a valid TCP port")?;

        let log_level = LogLevel::parse(&env_or("LOG_LEVEL", DEFAULT_LOG_LEVEL))?;

        let mongo_db_uri = require_env("MONGO_DB_URI")?;

        let mut beacon_urls = HashMap::new();
        for network in Network::ALL {
            let var_name = format!("BEACON_NODE_URL_{}", network.as_str().to_uppercase());
            beacon_urls.insert(network, require_env(&var_name)?);
        }

        let max_entries_per_bson: u32 = env_or(
            "MAX_ENTRIES_PER_BSON",
            DEFAULT_MAX_ENTRIES_PER_BSON.to_string(),
        )
        .parse()
        .context("MAX_ENTRIES_PER_BSON is not a valid integer")?;

        let jwt_users_file_path = PathBuf::from(require_env("JWT_USERS_FILE_PATH")?);

        Ok(Self {
            api_port,
            log_level,
            mongo_db_uri,
            beacon_urls,
            max_entries_per_bson,
            jwt_users_file_path,
        })
    }
}
