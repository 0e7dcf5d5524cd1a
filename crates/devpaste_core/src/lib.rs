//! Core domain library for DevPaste: models, storage, cache, and the paste
//! lifecycle engine.

/// Fast cache in front of the durable store.
pub mod cache;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Password hashing.
pub mod credentials;
/// Database access layer.
pub mod db;
/// Environment helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Paste identifier generation.
pub mod ids;
/// Create/read/list/delete orchestration.
pub mod lifecycle;
/// Data models for API requests and persistence.
pub mod models;
/// Durable store capability.
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{MemoryCache, NoCache, PasteCache};
pub use config::Config;
pub use constants::{
    DEFAULT_CLI_SERVER_URL, DEFAULT_LIST_LIMIT, DEFAULT_PORT, MAX_LIST_LIMIT, PASSWORD_HEADER,
};
pub use credentials::{Argon2Hasher, CredentialHasher};
pub use db::Database;
pub use error::AppError;
pub use ids::{AlphanumericIds, IdGenerator};
pub use lifecycle::PasteLifecycle;
pub use store::PasteStore;
