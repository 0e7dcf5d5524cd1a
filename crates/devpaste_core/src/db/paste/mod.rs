//! Paste storage operations backed by redb.

mod helpers;

use crate::{
    db::tables::*,
    error::AppError,
    models::{paste::Paste, view::PasteMeta},
};
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

use self::helpers::{load_for_write, remove_rows};

pub(crate) use self::helpers::{deserialize_paste, reverse_timestamp_key};

/// Accessor for paste-related redb tables.
pub struct PasteDb {
    db: Arc<redb::Database>,
}

impl PasteDb {
    /// Initialize paste tables if they do not exist yet.
    ///
    /// # Returns
    /// A new [`PasteDb`] accessor bound to `db`.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.open_table(PASTES_BY_CREATED)?;
        write_txn.open_table(PASTE_IDS_ISSUED)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new paste row, its index entry, and its issued-id marker.
    ///
    /// `created_at` and `updated_at` are stamped on `paste` here; whatever the
    /// caller put in them is overwritten.
    ///
    /// # Errors
    /// Returns [`AppError::DuplicateId`] when the id was ever issued before,
    /// otherwise storage or serialization errors.
    pub fn insert(&self, paste: &mut Paste) -> Result<(), AppError> {
        let now = Utc::now();
        paste.created_at = now;
        paste.updated_at = now;
        let encoded = bincode::serialize(&*paste)?;
        let created_key = reverse_timestamp_key(paste.created_at);
        let id = paste.id.as_str();

        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_created = write_txn.open_table(PASTES_BY_CREATED)?;
            let mut issued = write_txn.open_table(PASTE_IDS_ISSUED)?;

            if issued.get(id)?.is_some() || pastes.get(id)?.is_some() {
                return Err(AppError::DuplicateId(id.to_string()));
            }

            pastes.insert(id, encoded.as_slice())?;
            by_created.insert((created_key, id), ())?;
            issued.insert(id, ())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Fetch a paste by id.
    ///
    /// # Returns
    /// `Ok(Some(paste))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        match pastes.get(id)? {
            Some(value) => Ok(Some(deserialize_paste(value.value())?)),
            None => Ok(None),
        }
    }

    /// Atomically add one to the view counter.
    ///
    /// # Returns
    /// The post-increment count, or `None` when the row is gone.
    pub fn increment_views(&self, id: &str) -> Result<Option<u64>, AppError> {
        let write_txn = self.db.begin_write()?;
        let views = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let Some(mut paste) = load_for_write(&pastes, id)? else {
                return Ok(None);
            };
            paste.views = paste.views.saturating_add(1);
            paste.updated_at = Utc::now();
            let encoded = bincode::serialize(&paste)?;
            pastes.insert(id, encoded.as_slice())?;
            paste.views
        };
        write_txn.commit()?;
        Ok(Some(views))
    }

    /// Count one disclosure and, for burn-after-read pastes, delete the row in
    /// the same transaction.
    ///
    /// Concurrent callers are serialized by the write lock, so exactly one of
    /// them sees a burn-after-read paste; the rest get `None`.
    ///
    /// # Returns
    /// The record as disclosed (views already incremented), or `None` when the
    /// row is gone.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn record_disclosure(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let write_txn = self.db.begin_write()?;
        let disclosed = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_created = write_txn.open_table(PASTES_BY_CREATED)?;
            let Some(mut paste) = load_for_write(&pastes, id)? else {
                return Ok(None);
            };
            paste.views = paste.views.saturating_add(1);
            paste.updated_at = Utc::now();
            if paste.burn_after_read {
                remove_rows(&mut pastes, &mut by_created, &paste)?;
            } else {
                let encoded = bincode::serialize(&paste)?;
                pastes.insert(id, encoded.as_slice())?;
            }
            paste
        };
        write_txn.commit()?;
        Ok(Some(disclosed))
    }

    /// Delete a paste by id and return the deleted row.
    ///
    /// # Returns
    /// `Ok(Some(paste))` when deleted, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn delete_and_return(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_created = write_txn.open_table(PASTES_BY_CREATED)?;
            let Some(paste) = load_for_write(&pastes, id)? else {
                return Ok(None);
            };
            remove_rows(&mut pastes, &mut by_created, &paste)?;
            paste
        };
        write_txn.commit()?;
        Ok(Some(deleted))
    }

    /// Delete a paste by id.
    ///
    /// # Returns
    /// `Ok(true)` when deleted, `Ok(false)` when missing.
    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.delete_and_return(id)?.is_some())
    }

    /// Newest-first listing of public, unexpired pastes.
    ///
    /// # Arguments
    /// - `limit`: Maximum number of rows to return. Zero yields an empty list.
    /// - `now`: Reference instant for the expiry filter.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list_public(&self, limit: usize, now: DateTime<Utc>) -> Result<Vec<PasteMeta>, AppError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let read_txn = self.db.begin_read()?;
        let by_created = read_txn.open_table(PASTES_BY_CREATED)?;
        let pastes = read_txn.open_table(PASTES)?;

        let mut listed = Vec::with_capacity(limit.min(64));
        for item in by_created.iter()? {
            let (key, _) = item?;
            let (_, id) = key.value();
            let Some(row) = pastes.get(id)? else {
                tracing::warn!(paste_id = id, "creation index points at a missing paste row");
                continue;
            };
            let paste = deserialize_paste(row.value())?;
            if paste.is_listed_at(now) {
                listed.push(PasteMeta::from(&paste));
                if listed.len() >= limit {
                    break;
                }
            }
        }
        Ok(listed)
    }

    /// Number of stored paste rows, expired ones included.
    pub fn len(&self) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        let mut count = 0u64;
        for item in pastes.iter()? {
            item?;
            count += 1;
        }
        Ok(count)
    }

    /// Whether no paste rows are stored.
    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }

    /// Physically remove every paste whose expiry is at or before `now`.
    ///
    /// Candidates are collected under a read snapshot, then re-checked inside
    /// the write transaction so a concurrent delete is not an error.
    ///
    /// # Returns
    /// Number of rows removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let candidates: Vec<String> = {
            let read_txn = self.db.begin_read()?;
            let pastes = read_txn.open_table(PASTES)?;
            let mut ids = Vec::new();
            for item in pastes.iter()? {
                let (key, value) = item?;
                let paste = deserialize_paste(value.value())?;
                if paste.is_expired_at(now) {
                    ids.push(key.value().to_string());
                }
            }
            ids
        };
        if candidates.is_empty() {
            return Ok(0);
        }

        let write_txn = self.db.begin_write()?;
        let mut removed = 0usize;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_created = write_txn.open_table(PASTES_BY_CREATED)?;
            for id in &candidates {
                let Some(paste) = load_for_write(&pastes, id)? else {
                    continue;
                };
                if paste.is_expired_at(now) {
                    remove_rows(&mut pastes, &mut by_created, &paste)?;
                    removed += 1;
                }
            }
        }
        write_txn.commit()?;
        Ok(removed)
    }
}
