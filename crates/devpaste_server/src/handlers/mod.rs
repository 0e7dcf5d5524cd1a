//! HTTP request handlers.

pub(crate) mod normalize;
/// Paste-related endpoints.
pub mod paste;
