use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Routes that require the admin session. The router is layered with
/// `require_admin` in `create_router`; unauthenticated requests are redirected to
/// `/login/?next=<path>` before any handler runs.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /report/{id}/
        // Detail page of a single report, accepted or not.
        .route("/report/{id}/", get(handlers::detail))
}
