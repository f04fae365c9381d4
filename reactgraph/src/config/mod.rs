//! Engine configuration: defaults, `config.toml`, and environment overrides.
//!
//! Precedence, lowest first: built-in defaults, the `[engine]` table of
//! `<config_dir>/<app>/config.toml`, then the process environment (after loading a
//! project `.env`, whose values never override variables that are already set).
//!
//! | Variable                    | Meaning                               |
//! |-----------------------------|---------------------------------------|
//! | `REACTGRAPH_MAX_CYCLES`     | agent/tools cycles allowed per run    |
//! | `REACTGRAPH_SESSION_POLICY` | `queue` or `reject`                   |

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::graph::SessionPolicy;

pub const ENV_MAX_CYCLES: &str = "REACTGRAPH_MAX_CYCLES";
pub const ENV_SESSION_POLICY: &str = "REACTGRAPH_SESSION_POLICY";

/// Cycle limit used when nothing else is configured.
pub const DEFAULT_MAX_CYCLES: usize = 25;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to load .env: {0}")]
    Dotenv(#[from] dotenv::Error),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: String, value: String },
}

/// Run-control settings for `GraphEngine`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound on agent -> tools -> agent cycles in one run.
    pub max_cycles: usize,
    /// What a second concurrent run on the same session does.
    pub session_policy: SessionPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cycles: DEFAULT_MAX_CYCLES,
            session_policy: SessionPolicy::default(),
        }
    }
}

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    engine: EngineTable,
}

#[derive(Deserialize, Default)]
struct EngineTable {
    max_cycles: Option<i64>,
    session_policy: Option<String>,
}

impl EngineConfig {
    /// Defaults plus environment overrides (`.env` loaded first).
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv(dotenv::dotenv())?;
        Self::default().apply_overrides(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with the `[engine]` table of a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(s)?;
        let mut config = Self::default();
        if let Some(n) = file.engine.max_cycles {
            config.max_cycles = parse_max_cycles(&n.to_string())?;
        }
        if let Some(p) = file.engine.session_policy {
            config.session_policy = parse_policy(&p)?;
        }
        Ok(config)
    }

    /// Reads a TOML file; a missing file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// `<config_dir>/<app_name>/config.toml`, then `.env` and environment overrides.
    pub fn load(app_name: &str) -> Result<Self, ConfigError> {
        let config = match config_path(app_name) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        load_dotenv(dotenv::dotenv())?;
        config.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup` (an environment accessor).
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_MAX_CYCLES).filter(|v| !v.trim().is_empty()) {
            self.max_cycles = parse_max_cycles(&v)?;
        }
        if let Some(v) = lookup(ENV_SESSION_POLICY).filter(|v| !v.trim().is_empty()) {
            self.session_policy = parse_policy(&v)?;
        }
        Ok(self)
    }
}

/// A missing `.env` is fine; any other failure (unreadable file, bad line) is an error.
fn load_dotenv<T>(result: Result<T, dotenv::Error>) -> Result<(), ConfigError> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// `$XDG_CONFIG_HOME/<app>/config.toml`, else the platform config dir.
fn config_path(app_name: &str) -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)?;
    Some(base.join(app_name).join("config.toml"))
}

fn parse_max_cycles(value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            key: "max_cycles".to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_policy(value: &str) -> Result<SessionPolicy, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        key: "session_policy".to_string(),
        value: value.to_string(),
    })
}
