//! HTTP server wiring for DevPaste (API, handlers, and shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for paste endpoints.
pub mod handlers;

pub use devpaste_core::{
    config, db, models, AppError, Config, Database, PasteLifecycle, DEFAULT_PORT,
};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use devpaste_core::{
    AlphanumericIds, Argon2Hasher, MemoryCache, PasteCache, PASSWORD_HEADER,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

const CONTENT_SECURITY_POLICY: &str = "default-src 'none'; frame-ancestors 'none'; base-uri 'none'; form-action 'none'";

/// JSON request bodies carry some framing on top of the paste content.
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Request body ceiling for a configured paste size.
///
/// Escaping quotes, backslashes and newlines can double the encoded size of
/// the content. Content made mostly of other control characters, which JSON
/// encodes as six-byte `\u` escapes, can still exceed this and get 413.
fn body_limit_for(max_paste_size: usize) -> usize {
    max_paste_size
        .saturating_mul(2)
        .saturating_add(BODY_LIMIT_SLACK)
}

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub pastes: Arc<PasteLifecycle>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state with an in-process cache sized
    /// from `config`.
    ///
    /// # Errors
    /// Returns an error when the configured hash costs are invalid.
    pub fn new(config: Config, db: Database) -> Result<Self, AppError> {
        let cache = Arc::new(MemoryCache::new(config.cache_capacity));
        Self::with_cache(config, db, cache)
    }

    /// Construct shared application state over a caller-provided cache.
    ///
    /// # Errors
    /// Returns an error when the configured hash costs are invalid.
    pub fn with_cache(
        config: Config,
        db: Database,
        cache: Arc<dyn PasteCache>,
    ) -> Result<Self, AppError> {
        let hasher = Argon2Hasher::from_config(&config)?;
        let pastes = PasteLifecycle::new(
            Arc::new(db),
            cache,
            Arc::new(hasher),
            Arc::new(AlphanumericIds::default()),
        )
        .with_cache_ttl(config.cache_ttl());
        Ok(Self {
            pastes: Arc::new(pastes),
            config: Arc::new(config),
        })
    }
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    let cors_port = state.config.port;
    create_app_with_cors_port(state, allow_public_access, cors_port)
}

/// Resolve the listener address from env var overrides and security policy.
///
/// # Arguments
/// - `config`: Server configuration containing the configured `port`.
/// - `allow_public_access`: Whether non-loopback bind targets are permitted.
///
/// # Returns
/// A validated socket address that enforces loopback when public access is disabled.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

fn cors_layer(allow_public_access: bool, cors_port: u16) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::DELETE];
    if allow_public_access {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = ["localhost", "127.0.0.1"]
        .iter()
        .filter_map(|host| HeaderValue::from_str(&format!("http://{}:{}", host, cors_port)).ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(PASSWORD_HEADER),
        ])
}

fn create_app_with_cors_port(state: AppState, allow_public_access: bool, cors_port: u16) -> Router {
    let body_limit = body_limit_for(state.config.max_paste_size);

    Router::new()
        .route(
            "/api/pastes",
            post(handlers::paste::create_paste).get(handlers::paste::list_pastes),
        )
        .route(
            "/api/pastes/:id",
            get(handlers::paste::get_paste)
                .post(handlers::paste::unlock_paste)
                .delete(handlers::paste::delete_paste),
        )
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(allow_public_access, cors_port))
                .layer(SetResponseHeaderLayer::overriding(
                    header::CONTENT_SECURITY_POLICY,
                    HeaderValue::from_static(CONTENT_SECURITY_POLICY),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
}

fn listener_cors_port(listener: &tokio::net::TcpListener, fallback_port: u16) -> u16 {
    listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(fallback_port)
}

/// Run the Axum server with graceful shutdown support.
///
/// # Arguments
/// - `listener`: Bound TCP listener for the server.
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
/// - `shutdown_signal`: Future that resolves when shutdown should start.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let cors_port = listener_cors_port(&listener, state.config.port);
    let app = create_app_with_cors_port(state, allow_public_access, cors_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
