//! Data models for persistence and API payloads.

/// Paste records and creation payloads.
pub mod paste;
/// Redacted and listing projections of pastes.
pub mod view;
