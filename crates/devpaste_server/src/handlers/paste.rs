//! Paste HTTP handlers.

use super::normalize::validate_create_request;
use crate::{
    error::HttpError,
    models::{
        paste::{CreatePasteRequest, ListQuery, UnlockRequest},
        view::{PasteMeta, PasteView},
    },
    AppError, AppState, PasteLifecycle,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use devpaste_core::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, PASSWORD_HEADER};
use hyper::HeaderMap;

fn normalized_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

fn password_from_headers(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(PASSWORD_HEADER) else {
        return Ok(None);
    };
    let password = value.to_str().map_err(|_| {
        AppError::BadRequest(format!(
            "{} header must be visible ASCII; send non-ASCII passwords as {{\"password\": ...}} to POST /api/pastes/:id",
            PASSWORD_HEADER
        ))
    })?;
    Ok(Some(password.to_string()))
}

/// Run a lifecycle call on the blocking pool.
///
/// Password hashing and redb transactions block, so they stay off the async
/// worker threads.
async fn with_pastes<T, F>(state: &AppState, op: F) -> Result<T, HttpError>
where
    F: FnOnce(&PasteLifecycle) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let pastes = state.pastes.clone();
    tokio::task::spawn_blocking(move || op(&pastes))
        .await
        .map_err(|err| {
            tracing::error!("Paste task aborted: {}", err);
            HttpError(AppError::Internal)
        })?
        .map_err(HttpError::from)
}

/// Create a new paste.
///
/// # Returns
/// `201 Created` with the stored paste view.
///
/// # Errors
/// Returns 400 for invalid payloads and 500 when persistence fails.
pub async fn create_paste(
    State(state): State<AppState>,
    Json(req): Json<CreatePasteRequest>,
) -> Result<(StatusCode, Json<PasteView>), HttpError> {
    let input = validate_create_request(req, state.config.max_paste_size)?;
    let created = with_pastes(&state, move |pastes| pastes.create(input)).await?;
    tracing::info!(paste_id = %created.id, "Created paste");
    Ok((StatusCode::CREATED, Json(created)))
}

/// List public, unexpired pastes newest first.
///
/// `limit` defaults to 20 and is clamped to `1..=100`.
pub async fn list_pastes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PasteMeta>>, HttpError> {
    let limit = normalized_limit(query.limit);
    let items = with_pastes(&state, move |pastes| pastes.list(Some(limit))).await?;
    Ok(Json(items))
}

/// Read a paste, taking an optional password from the `X-Paste-Password`
/// header.
///
/// # Returns
/// The full view, or the redacted view when a password is required and none
/// was sent.
///
/// The password header must be visible ASCII. Passwords outside that range
/// only work through [`unlock_paste`].
///
/// # Errors
/// 404 when missing or expired, 401 on a wrong password, 400 for a password
/// header that is not visible ASCII.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PasteView>, HttpError> {
    let password = password_from_headers(&headers)?;
    let view = with_pastes(&state, move |pastes| pastes.read(&id, password.as_deref())).await?;
    Ok(Json(view))
}

/// Read a paste with the password carried in the JSON body.
///
/// Keeps the secret out of URLs and proxy header logs.
pub async fn unlock_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UnlockRequest>,
) -> Result<Json<PasteView>, HttpError> {
    let view = with_pastes(&state, move |pastes| pastes.read(&id, Some(&req.password))).await?;
    Ok(Json(view))
}

/// Delete a paste.
///
/// # Returns
/// The deleted paste view.
///
/// # Errors
/// 404 when the paste does not exist.
pub async fn delete_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PasteView>, HttpError> {
    let deleted = with_pastes(&state, move |pastes| pastes.delete(&id)).await?;
    tracing::info!(paste_id = %deleted.id, "Deleted paste");
    Ok(Json(deleted))
}
