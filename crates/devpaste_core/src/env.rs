//! Process-global environment mutation helpers.
//!
//! Config and CLI tests mutate `DB_PATH`, `PORT` and friends; every mutation
//! goes through these helpers while holding [`env_lock`].

use std::sync::{Mutex, OnceLock};

/// Return the process-wide mutex that serializes environment mutation.
pub fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Set an environment variable.
///
/// Newer toolchains mark env mutation `unsafe`; older ones do not.
#[allow(unused_unsafe)]
pub fn set_env_var(key: &str, value: &str) {
    // SAFETY: callers hold `env_lock` while test threads may run in parallel.
    unsafe {
        std::env::set_var(key, value);
    }
}

/// Remove an environment variable.
#[allow(unused_unsafe)]
pub fn remove_env_var(key: &str) {
    // SAFETY: callers hold `env_lock` while test threads may run in parallel.
    unsafe {
        std::env::remove_var(key);
    }
}

/// Scoped override of one environment variable, restored on drop.
pub struct EnvGuard {
    key: String,
    previous: Option<String>,
}

impl EnvGuard {
    /// Set `key=value` until the guard is dropped.
    pub fn set(key: &str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        set_env_var(key, value);
        Self {
            key: key.to_string(),
            previous,
        }
    }

    /// Unset `key` until the guard is dropped.
    pub fn remove(key: &str) -> Self {
        let previous = std::env::var(key).ok();
        remove_env_var(key);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.previous.as_deref() {
            Some(previous) => set_env_var(&self.key, previous),
            None => remove_env_var(&self.key),
        }
    }
}
