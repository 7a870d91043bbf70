use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints reachable without a session. The listing only ever shows accepted
/// reports; individual reports live behind the authenticated router.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Every accepted report, newest first.
        .route("/", get(handlers::index))
        // GET/POST /create/
        // The anonymous submission form.
        .route(
            "/create/",
            get(handlers::create_form).post(handlers::create_report),
        )
        // GET/POST /login/
        // Shared-password login; honours ?next= after success.
        .route("/login/", get(handlers::login_form).post(handlers::login))
        // GET/POST /logout/
        // GET confirms, POST clears the session.
        .route("/logout/", get(handlers::logout_form).post(handlers::logout))
}
