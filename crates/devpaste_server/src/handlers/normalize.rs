//! Validation and normalization of inbound paste payloads.

use crate::{
    models::paste::{CreatePasteRequest, ExpiresIn, Language, NewPaste},
    AppError,
};

/// Normalize optional text fields.
///
/// Empty or whitespace-only values are treated as absent.
pub(super) fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Turn a raw create payload into engine input.
///
/// # Arguments
/// - `req`: Payload as received.
/// - `max_paste_size`: Largest accepted content, in bytes.
///
/// # Errors
/// Returns [`AppError::BadRequest`] for blank or oversized content and for
/// language or expiry labels outside the accepted sets.
pub(super) fn validate_create_request(
    req: CreatePasteRequest,
    max_paste_size: usize,
) -> Result<NewPaste, AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Content must not be empty".to_string(),
        ));
    }
    if req.content.len() > max_paste_size {
        return Err(AppError::BadRequest(format!(
            "Paste size exceeds maximum of {} bytes",
            max_paste_size
        )));
    }

    let language = match normalize_optional(req.language) {
        Some(label) => Some(Language::parse(&label).ok_or_else(|| {
            AppError::BadRequest(format!("Unsupported language '{}'", label))
        })?),
        None => None,
    };
    let expires_in = match normalize_optional(req.expires_in) {
        Some(label) => Some(ExpiresIn::parse(&label).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid expiresIn '{}'; expected one of 1hour, 1day, 1week, never",
                label
            ))
        })?),
        None => None,
    };

    Ok(NewPaste {
        content: req.content,
        title: normalize_optional(req.title),
        password: req.password.filter(|password| !password.is_empty()),
        language,
        expires_in,
        burn_after_read: req.burn_after_read.unwrap_or(false),
        is_private: req.is_private.unwrap_or(false),
    })
}
