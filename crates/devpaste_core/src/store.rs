//! Durable paste storage seam used by the lifecycle engine.

use crate::{
    db::Database,
    error::AppError,
    models::{paste::Paste, view::PasteMeta},
};
use chrono::{DateTime, Utc};

/// Source of truth for paste records.
///
/// Every method is a single atomic step against the backing store.
pub trait PasteStore: Send + Sync {
    /// Persist a new record, stamping its timestamps in place.
    ///
    /// # Errors
    /// [`AppError::DuplicateId`] when the id is taken or was ever issued.
    fn insert(&self, paste: &mut Paste) -> Result<(), AppError>;

    /// Fetch by id.
    fn get(&self, id: &str) -> Result<Option<Paste>, AppError>;

    /// Add one view; returns the post-increment count.
    fn increment_views(&self, id: &str) -> Result<Option<u64>, AppError>;

    /// Add one view and delete the row if it is burn-after-read, atomically.
    fn record_disclosure(&self, id: &str) -> Result<Option<Paste>, AppError>;

    /// Remove by id, returning the removed record.
    fn delete_and_return(&self, id: &str) -> Result<Option<Paste>, AppError>;

    /// Remove by id. Removing a missing id reports `false`, not an error.
    fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.delete_and_return(id)?.is_some())
    }

    /// Newest-first public pastes that are unexpired at `now`.
    fn list_public(&self, limit: usize, now: DateTime<Utc>) -> Result<Vec<PasteMeta>, AppError>;
}

impl PasteStore for Database {
    fn insert(&self, paste: &mut Paste) -> Result<(), AppError> {
        self.pastes.insert(paste)
    }

    fn get(&self, id: &str) -> Result<Option<Paste>, AppError> {
        self.pastes.get(id)
    }

    fn increment_views(&self, id: &str) -> Result<Option<u64>, AppError> {
        self.pastes.increment_views(id)
    }

    fn record_disclosure(&self, id: &str) -> Result<Option<Paste>, AppError> {
        self.pastes.record_disclosure(id)
    }

    fn delete_and_return(&self, id: &str) -> Result<Option<Paste>, AppError> {
        self.pastes.delete_and_return(id)
    }

    fn delete(&self, id: &str) -> Result<bool, AppError> {
        self.pastes.delete(id)
    }

    fn list_public(&self, limit: usize, now: DateTime<Utc>) -> Result<Vec<PasteMeta>, AppError> {
        self.pastes.list_public(limit, now)
    }
}
