//! Caller-facing projections of a [`Paste`].
//!
//! These are the only paste shapes that leave the core. None of them carries
//! the credential hash; whether content is present is decided here.

use super::paste::{Language, Paste};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Paste as returned by create, read and delete.
///
/// `content` is `None` in the redacted view handed out when a password is
/// required but was not supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteView {
    pub id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub language: Language,
    pub expires_at: Option<DateTime<Utc>>,
    pub burn_after_read: bool,
    pub is_private: bool,
    pub views: u64,
    pub has_password: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PasteView {
    /// Full view with content, for authorized disclosure.
    pub fn disclosed(paste: &Paste) -> Self {
        Self {
            content: Some(paste.content.clone()),
            ..Self::redacted(paste)
        }
    }

    /// Metadata-only view with content withheld.
    pub fn redacted(paste: &Paste) -> Self {
        Self {
            id: paste.id.clone(),
            title: paste.title.clone(),
            content: None,
            language: paste.language,
            expires_at: paste.expires_at,
            burn_after_read: paste.burn_after_read,
            is_private: paste.is_private,
            views: paste.views,
            has_password: paste.has_password(),
            created_at: paste.created_at,
            updated_at: paste.updated_at,
        }
    }
}

/// Listing row: no content and no access-control fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteMeta {
    pub id: String,
    pub title: Option<String>,
    pub language: Language,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&Paste> for PasteMeta {
    fn from(value: &Paste) -> Self {
        Self {
            id: value.id.clone(),
            title: value.title.clone(),
            language: value.language,
            views: value.views,
            created_at: value.created_at,
            expires_at: value.expires_at,
        }
    }
}
