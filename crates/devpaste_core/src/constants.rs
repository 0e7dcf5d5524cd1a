//! Shared constants used across DevPaste crates.

/// Default API port for DevPaste.
pub const DEFAULT_PORT: u16 = 4000;

/// Default maximum paste size accepted by the API layer.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 10 * 1024 * 1024;

/// Default time-to-live for cached paste records, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
/// Default upper bound on cached paste records.
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default number of rows returned by the public listing.
pub const DEFAULT_LIST_LIMIT: usize = 20;
/// Largest listing page the API layer will serve.
pub const MAX_LIST_LIMIT: usize = 100;

/// Length of generated paste identifiers.
pub const PASTE_ID_LENGTH: usize = 8;
/// Alphabet paste identifiers are drawn from.
pub const PASTE_ID_ALPHABET: &[u8] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Total insert attempts (first try plus retries) when a generated id collides.
pub const PASTE_ID_INSERT_ATTEMPTS: usize = 3;

/// Prefix applied to paste ids to form cache keys.
pub const CACHE_KEY_PREFIX: &str = "paste:";

/// Header carrying a paste password on `GET` reads.
pub const PASSWORD_HEADER: &str = "x-paste-password";

/// Default base URL for CLI/API clients.
pub const DEFAULT_CLI_SERVER_URL: &str = "http://localhost:4000";
