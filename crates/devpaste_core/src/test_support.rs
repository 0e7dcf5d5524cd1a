//! Shared test-only helpers for devpaste_core.

use crate::cache::{CacheError, CachedPaste, PasteCache};
use crate::credentials::Argon2Hasher;
use crate::error::AppError;
use crate::ids::{AlphanumericIds, IdGenerator};
use crate::models::paste::{Language, Paste};
use crate::models::view::PasteMeta;
use crate::store::PasteStore;
use crate::Database;
use argon2::Params;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
///
/// # Panics
/// Panics if temp-dir creation, path conversion, or database initialization
/// fails in the test environment.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

/// Argon2 hasher at minimum cost so tests stay fast.
pub(crate) fn fast_hasher() -> Argon2Hasher {
    Argon2Hasher::with_cost(Params::MIN_M_COST, 1, 1).expect("minimum argon2 params")
}

/// Unprotected, public, non-expiring paste with the given id.
pub(crate) fn sample_paste(id: &str) -> Paste {
    let now = Utc::now();
    Paste {
        id: id.to_string(),
        title: Some(format!("title {}", id)),
        content: format!("content of {}", id),
        language: Language::Plaintext,
        credential_hash: None,
        expires_at: None,
        burn_after_read: false,
        is_private: false,
        views: 0,
        created_at: now,
        updated_at: now,
    }
}

/// Cache whose every operation fails, for degradation tests.
pub(crate) struct FailingCache;

impl PasteCache for FailingCache {
    fn get(&self, _key: &str) -> Result<Option<CachedPaste>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    fn set(&self, _key: &str, _value: CachedPaste, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Timeout)
    }

    fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

/// Id generator that replays a fixed script, then falls back to random ids.
pub(crate) struct ScriptedIds {
    script: Mutex<VecDeque<String>>,
    fallback: AlphanumericIds,
}

impl ScriptedIds {
    pub(crate) fn new(ids: &[&str]) -> Self {
        Self {
            script: Mutex::new(ids.iter().map(|id| id.to_string()).collect()),
            fallback: AlphanumericIds::default(),
        }
    }
}

impl IdGenerator for ScriptedIds {
    fn generate(&self) -> String {
        self.script
            .lock()
            .expect("id script lock")
            .pop_front()
            .unwrap_or_else(|| self.fallback.generate())
    }
}

/// Store whose every operation fails, for error-propagation tests.
pub(crate) struct UnavailableStore;

impl UnavailableStore {
    fn failure() -> AppError {
        AppError::StorageMessage("store unavailable".to_string())
    }
}

impl PasteStore for UnavailableStore {
    fn insert(&self, _paste: &mut Paste) -> Result<(), AppError> {
        Err(Self::failure())
    }

    fn get(&self, _id: &str) -> Result<Option<Paste>, AppError> {
        Err(Self::failure())
    }

    fn increment_views(&self, _id: &str) -> Result<Option<u64>, AppError> {
        Err(Self::failure())
    }

    fn record_disclosure(&self, _id: &str) -> Result<Option<Paste>, AppError> {
        Err(Self::failure())
    }

    fn delete_and_return(&self, _id: &str) -> Result<Option<Paste>, AppError> {
        Err(Self::failure())
    }

    fn list_public(
        &self,
        _limit: usize,
        _now: DateTime<Utc>,
    ) -> Result<Vec<PasteMeta>, AppError> {
        Err(Self::failure())
    }
}
