//! Paste lifecycle engine: create, read, list, and delete across the durable
//! store and the fast cache.
//!
//! The store is authoritative. The cache only ever shortens the path to a
//! record; expiry, password and burn-after-read checks run the same way
//! whether the record came from the cache or the store, and a failing cache
//! degrades every operation to a plain store round trip.

use crate::{
    cache::{cache_key, CachedPaste, PasteCache},
    constants::{DEFAULT_CACHE_TTL_SECS, DEFAULT_LIST_LIMIT, PASTE_ID_INSERT_ATTEMPTS},
    credentials::CredentialHasher,
    error::AppError,
    ids::IdGenerator,
    models::{
        paste::{NewPaste, Paste},
        view::{PasteMeta, PasteView},
    },
    store::PasteStore,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};


/// Orchestrates paste operations over injected collaborators.
///
/// Holds no per-paste state; clone the `Arc` and share it across threads.
pub struct PasteLifecycle {
    store: Arc<dyn PasteStore>,
    cache: Arc<dyn PasteCache>,
    hasher: Arc<dyn CredentialHasher>,
    ids: Arc<dyn IdGenerator>,
    cache_ttl: Duration,
}

impl PasteLifecycle {
    /// Build an engine with the default cache time-to-live.
    pub fn new(
        store: Arc<dyn PasteStore>,
        cache: Arc<dyn PasteCache>,
        hasher: Arc<dyn CredentialHasher>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            cache,
            hasher,
            ids,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }

    /// Override how long disclosed pastes stay cached.
    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// Create and persist a paste.
    ///
    /// An empty password counts as no password. Id collisions are retried
    /// with fresh ids a bounded number of times.
    ///
    /// # Returns
    /// The stored paste as a full view, without the credential hash.
    ///
    /// # Errors
    /// Propagates hashing and store failures, including
    /// [`AppError::DuplicateId`] once retries are exhausted.
    pub fn create(&self, input: NewPaste) -> Result<PasteView, AppError> {
        let credential_hash = match input.password.as_deref() {
            Some(password) if !password.is_empty() => Some(self.hasher.hash(password)?),
            _ => None,
        };
        let now = Utc::now();
        let mut paste = Paste {
            id: String::new(),
            title: input.title,
            content: input.content,
            language: input.language.unwrap_or_default(),
            credential_hash,
            expires_at: input.expires_in.and_then(|expires_in| expires_in.expires_at(now)),
            burn_after_read: input.burn_after_read,
            is_private: input.is_private,
            views: 0,
            created_at: now,
            updated_at: now,
        };

        for attempt in 1..=PASTE_ID_INSERT_ATTEMPTS {
            paste.id = self.ids.generate();
            match self.store.insert(&mut paste) {
                Ok(()) => {
                    debug!(
                        paste_id = %paste.id,
                        protected = paste.has_password(),
                        burn_after_read = paste.burn_after_read,
                        "paste created"
                    );
                    return Ok(PasteView::disclosed(&paste));
                }
                Err(AppError::DuplicateId(id)) if attempt < PASTE_ID_INSERT_ATTEMPTS => {
                    warn!(paste_id = %id, attempt, "paste id collision, regenerating");
                }
                Err(err) => return Err(err),
            }
        }
        Err(AppError::DuplicateId(paste.id))
    }

    /// Read a paste, enforcing expiry, password and burn-after-read.
    ///
    /// # Arguments
    /// - `id`: Paste id.
    /// - `password`: Candidate password. `None` and `Some("")` both mean no
    ///   candidate was supplied.
    ///
    /// # Returns
    /// - The full view when disclosure is authorized; its view count already
    ///   includes this read.
    /// - The redacted view when the paste is protected and no candidate was
    ///   supplied. Nothing is counted or cached in that case.
    ///
    /// # Errors
    /// - [`AppError::NotFound`] when the paste is missing, expired, or was
    ///   consumed by a concurrent burn-after-read disclosure.
    /// - [`AppError::Unauthorized`] when the candidate password is wrong.
    /// - Store and hashing failures otherwise. Cache failures never surface.
    pub fn read(&self, id: &str, password: Option<&str>) -> Result<PasteView, AppError> {
        let key = cache_key(id);
        let (paste, from_cache) = match self.cached(&key) {
            Some(paste) => (paste, true),
            None => (self.store.get(id)?.ok_or(AppError::NotFound)?, false),
        };

        if paste.is_expired_at(Utc::now()) {
            self.store.delete(id)?;
            self.invalidate(&key);
            debug!(paste_id = id, "expired paste removed on access");
            return Err(AppError::NotFound);
        }

        if let Some(credential_hash) = paste.credential_hash.as_deref() {
            let Some(candidate) = password.filter(|candidate| !candidate.is_empty()) else {
                // A cached record can outlive its row; confirm it still exists.
                if from_cache && self.store.get(id)?.is_none() {
                    self.invalidate(&key);
                    return Err(AppError::NotFound);
                }
                return Ok(PasteView::redacted(&paste));
            };
            if !self.hasher.verify(candidate, credential_hash)? {
                debug!(paste_id = id, "password rejected");
                return Err(AppError::Unauthorized);
            }
        }

        let Some(disclosed) = self.store.record_disclosure(id)? else {
            self.invalidate(&key);
            return Err(AppError::NotFound);
        };
        if disclosed.burn_after_read {
            self.invalidate(&key);
            debug!(paste_id = id, "burn-after-read paste consumed");
        } else {
            self.populate(&key, &disclosed);
        }
        Ok(PasteView::disclosed(&disclosed))
    }

    /// Newest-first public, unexpired pastes.
    ///
    /// `None` uses the default page size; zero yields an empty list. Always
    /// served from the store.
    pub fn list(&self, limit: Option<usize>) -> Result<Vec<PasteMeta>, AppError> {
        self.store
            .list_public(limit.unwrap_or(DEFAULT_LIST_LIMIT), Utc::now())
    }

    /// Delete a paste unconditionally.
    ///
    /// The cache entry is invalidated before and after the store delete, so a
    /// concurrent read cannot leave the removed paste cached.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when the store has no such id.
    pub fn delete(&self, id: &str) -> Result<PasteView, AppError> {
        let key = cache_key(id);
        self.invalidate(&key);
        let deleted = self
            .store
            .delete_and_return(id)?
            .ok_or(AppError::NotFound)?;
        self.invalidate(&key);
        debug!(paste_id = id, "paste deleted");
        Ok(PasteView::disclosed(&deleted))
    }

    fn cached(&self, key: &str) -> Option<Paste> {
        match self.cache.get(key) {
            Ok(Some(entry)) => {
                debug!(cache_key = key, "cache hit");
                Some(entry.into_paste())
            }
            Ok(None) => {
                debug!(cache_key = key, "cache miss");
                None
            }
            Err(err) => {
                warn!(cache_key = key, error = %err, "cache read failed, using store");
                None
            }
        }
    }

    fn populate(&self, key: &str, paste: &Paste) {
        if let Err(err) = self
            .cache
            .set(key, CachedPaste::new(paste.clone()), self.cache_ttl)
        {
            warn!(cache_key = key, error = %err, "cache write failed");
        }
    }

    fn invalidate(&self, key: &str) {
        if let Err(err) = self.cache.delete(key) {
            warn!(cache_key = key, error = %err, "cache invalidation failed");
        }
    }
}
