//! Paste records, the closed language set, and creation payloads.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical paste row as persisted by the store and held by the cache.
///
/// This type carries the credential hash and is never handed to callers
/// directly; project it through [`crate::models::view::PasteView`] or
/// [`crate::models::view::PasteMeta`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paste {
    pub id: String,
    pub title: Option<String>,
    pub content: String,
    pub language: Language,
    pub credential_hash: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub burn_after_read: bool,
    pub is_private: bool,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Paste {
    /// Whether a password gates disclosure of this paste.
    pub fn has_password(&self) -> bool {
        self.credential_hash.is_some()
    }

    /// Whether this paste has logically expired at `now`.
    ///
    /// Expiry is inclusive: a paste expiring exactly at `now` is expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Whether this paste belongs in the public listing at `now`.
    pub fn is_listed_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_private && !self.is_expired_at(now)
    }
}

/// Languages a paste may be labelled with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Plaintext,
    Javascript,
    Typescript,
    Python,
    Java,
    Go,
    Rust,
    Cpp,
    Html,
    Css,
    Json,
    Sql,
    Bash,
    Markdown,
}

impl Language {
    /// Every recognized language, in display order.
    pub const ALL: [Language; 14] = [
        Language::Plaintext,
        Language::Javascript,
        Language::Typescript,
        Language::Python,
        Language::Java,
        Language::Go,
        Language::Rust,
        Language::Cpp,
        Language::Html,
        Language::Css,
        Language::Json,
        Language::Sql,
        Language::Bash,
        Language::Markdown,
    ];

    /// Wire label for this language.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plaintext => "plaintext",
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Cpp => "cpp",
            Self::Html => "html",
            Self::Css => "css",
            Self::Json => "json",
            Self::Sql => "sql",
            Self::Bash => "bash",
            Self::Markdown => "markdown",
        }
    }

    /// Parse a language label.
    ///
    /// Matching trims whitespace and ignores ASCII case.
    ///
    /// # Returns
    /// `Some(language)` for a recognized label, otherwise `None`.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|language| language.as_str() == normalized)
    }

    /// Map a file extension (with or without the leading dot) to a language.
    ///
    /// # Returns
    /// The matching language, or [`Language::Plaintext`] for unknown extensions.
    pub fn from_extension(extension: &str) -> Self {
        let ext = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Self::Javascript,
            "ts" | "tsx" => Self::Typescript,
            "py" => Self::Python,
            "java" => Self::Java,
            "go" => Self::Go,
            "rs" => Self::Rust,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => Self::Cpp,
            "html" | "htm" => Self::Html,
            "css" => Self::Css,
            "json" => Self::Json,
            "sql" => Self::Sql,
            "sh" | "bash" => Self::Bash,
            "md" | "markdown" => Self::Markdown,
            _ => Self::Plaintext,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative expiry choices offered at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiresIn {
    #[serde(rename = "1hour")]
    OneHour,
    #[serde(rename = "1day")]
    OneDay,
    #[serde(rename = "1week")]
    OneWeek,
    #[serde(rename = "never")]
    Never,
}

impl ExpiresIn {
    /// Every accepted expiry choice.
    pub const ALL: [ExpiresIn; 4] = [
        ExpiresIn::OneHour,
        ExpiresIn::OneDay,
        ExpiresIn::OneWeek,
        ExpiresIn::Never,
    ];

    /// Wire label for this choice.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneHour => "1hour",
            Self::OneDay => "1day",
            Self::OneWeek => "1week",
            Self::Never => "never",
        }
    }

    /// Parse a wire label such as `1hour`.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|choice| choice.as_str() == normalized)
    }

    /// Lifetime granted by this choice; `None` means the paste never expires.
    pub fn duration(self) -> Option<Duration> {
        match self {
            Self::OneHour => Some(Duration::hours(1)),
            Self::OneDay => Some(Duration::hours(24)),
            Self::OneWeek => Some(Duration::days(7)),
            Self::Never => None,
        }
    }

    /// Absolute expiry timestamp when applied at `now`.
    pub fn expires_at(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.duration().map(|lifetime| now + lifetime)
    }
}

impl fmt::Display for ExpiresIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated input to [`crate::lifecycle::PasteLifecycle::create`].
#[derive(Debug, Clone, Default)]
pub struct NewPaste {
    pub content: String,
    pub title: Option<String>,
    pub password: Option<String>,
    pub language: Option<Language>,
    pub expires_in: Option<ExpiresIn>,
    pub burn_after_read: bool,
    pub is_private: bool,
}

impl NewPaste {
    /// Start a creation payload with only `content` set.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Request payload for creating a paste, as received over HTTP.
///
/// Enumerated fields stay raw strings here so the API layer can reject
/// unknown values with a uniform error body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePasteRequest {
    pub content: String,
    pub title: Option<String>,
    pub password: Option<String>,
    pub language: Option<String>,
    pub expires_in: Option<String>,
    pub burn_after_read: Option<bool>,
    pub is_private: Option<bool>,
}

/// Request body carrying a candidate password for a protected paste.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockRequest {
    pub password: String,
}

/// Query parameters for listing public pastes.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}
