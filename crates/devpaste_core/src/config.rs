//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT,
};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Runtime configuration for DevPaste.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_paste_size: usize,
    pub cache_ttl_secs: u64,
    pub cache_capacity: u64,
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
    pub hash_parallelism: u32,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

/// The current user's home directory, falling back to the working directory.
pub fn resolve_home_dir() -> Option<PathBuf> {
    // Prefer explicit HOME if set (Unix, some Windows shells)
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows USERPROFILE (standard)
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

fn default_db_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("devpaste")
        .join("db")
        .to_string_lossy()
        .to_string()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
///
/// # Arguments
/// - `name`: Environment variable name.
///
/// # Returns
/// `true` when the value is a recognized truthy value.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn env_parse_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring unparseable {}='{}'", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or cannot be parsed.
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("DB_PATH")
                .map(expand_tilde)
                .unwrap_or_else(|_| default_db_path()),
            port: env_parse_or("PORT", DEFAULT_PORT),
            max_paste_size: env_parse_or("MAX_PASTE_SIZE", DEFAULT_MAX_PASTE_SIZE),
            cache_ttl_secs: env_parse_or("CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS),
            cache_capacity: env_parse_or("CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY),
            hash_memory_kib: env_parse_or("HASH_MEMORY_KIB", argon2::Params::DEFAULT_M_COST),
            hash_iterations: env_parse_or("HASH_ITERATIONS", argon2::Params::DEFAULT_T_COST),
            hash_parallelism: env_parse_or("HASH_PARALLELISM", argon2::Params::DEFAULT_P_COST),
        }
    }

    /// Time-to-live applied to cached paste records.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
