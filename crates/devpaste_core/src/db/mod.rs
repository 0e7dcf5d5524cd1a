//! Database layer for DevPaste.

/// Paste storage helpers.
pub mod paste;
/// redb table definitions.
pub mod tables;

use crate::error::AppError;
use std::path::Path;
use std::sync::Arc;

/// Database handle with access to the underlying redb tables.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub pastes: paste::PasteDb,
}

#[cfg(test)]
mod tests;

impl Database {
    /// Open (or create) the database under the `path` directory.
    ///
    /// # Arguments
    /// - `path`: Directory holding the redb file. Created when missing.
    ///
    /// # Returns
    /// A ready-to-use [`Database`] with all tables initialized.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created, the file is
    /// locked by another process, or table initialization fails.
    pub fn new(path: &str) -> Result<Self, AppError> {
        let dir = Path::new(path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                dir.display(),
                err
            ))
        })?;
        let file = dir.join(tables::REDB_FILE_NAME);
        let db = match redb::Database::create(&file) {
            Ok(db) => db,
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                return Err(AppError::StorageMessage(format!(
                    "Database '{}' is already open in another process",
                    file.display()
                )));
            }
            Err(err) => return Err(err.into()),
        };
        Self::from_shared(Arc::new(db))
    }

    /// Build a handle over an already open redb database.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        Ok(Self {
            pastes: paste::PasteDb::new(db.clone())?,
            db,
        })
    }

    /// Second handle over the same redb file, for use from another thread.
    ///
    /// # Errors
    /// Returns an error when table initialization fails.
    pub fn share(&self) -> Result<Self, AppError> {
        Self::from_shared(self.db.clone())
    }
}
