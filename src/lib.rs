use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use axum_extra::extract::cookie::Key;

use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod views;

// Routing split by access level (public, admin-session gated).
pub mod routes;
use routes::{authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::AppError;
pub use repository::{RepositoryState, SqliteReportRepository};

/// AppState
///
/// The single immutable container shared by every request: the report store, the
/// loaded configuration, and the key that signs session and flash cookies.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: abstracts the report table.
    pub repo: RepositoryState,
    /// Configuration loaded once at process start.
    pub config: AppConfig,
    /// Cookie signing key derived from `config.secret_key`.
    pub key: Key,
}

impl AppState {
    /// Assembles the state, failing when the configured secret cannot sign cookies.
    pub fn new(repo: RepositoryState, config: AppConfig) -> Result<Self, AppError> {
        let key = config.cookie_key()?;
        Ok(Self { repo, config, key })
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

// Required by `SignedCookieJar` and the `AdminSession` extractor.
impl FromRef<AppState> for Key {
    fn from_ref(app_state: &AppState) -> Key {
        app_state.key.clone()
    }
}

/// create_router
///
/// Assembles the routes, gates the admin routes behind the session check, installs
/// the 404 fallback and wraps everything in the request-id and tracing layers.
pub fn create_router(state: AppState) -> Router {
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(public::public_routes())
        // Every route in here is wrapped by `require_admin`.
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_admin,
            )),
        )
        .fallback(handlers::not_found)
        .with_state(state);

    base_router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
}

/// trace_span_logger
///
/// Span for `TraceLayer` carrying method, URI and the generated `x-request-id`, so
/// every log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
