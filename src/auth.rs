use axum::{
    extract::{FromRef, FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::AppError, flash::FLASH_COOKIE};

pub const SESSION_COOKIE: &str = "session";

/// A logged-in session outlives the browser; this mirrors a "permanent" session.
const SESSION_LIFETIME_DAYS: i64 = 31;

/// Characters escaped when the requested path is carried in `?next=`. `/` is kept readable.
const NEXT_PARAM: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'=')
    .add(b'?');

/// Session
///
/// The whole of the per-client state, serialized into the signed `session` cookie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub logged_in: bool,
}

impl Session {
    /// Reads the session from the jar. A missing, tampered or malformed cookie is a
    /// logged-out session.
    pub fn from_jar(jar: &SignedCookieJar) -> Self {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
            .unwrap_or_default()
    }
}

/// login
///
/// Compares `password` with the configured admin password by exact string equality.
/// On success the returned jar carries a long-lived authenticated session cookie;
/// on failure the session is left as it was.
pub fn login(
    jar: SignedCookieJar,
    config: &AppConfig,
    password: &str,
) -> Result<SignedCookieJar, AppError> {
    if password != config.admin_password {
        tracing::warn!("rejected admin login attempt");
        return Err(AppError::AuthFailure);
    }

    let value = serde_json::to_string(&Session { logged_in: true })?;
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.is_production())
        .max_age(time::Duration::days(SESSION_LIFETIME_DAYS));

    tracing::info!("admin logged in");
    Ok(jar.add(cookie))
}

/// logout
///
/// Clears all per-client state unconditionally: the session and any pending flashes.
pub fn logout(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
        .remove(Cookie::build(FLASH_COOKIE).path("/"))
}

/// The login page URL that returns the user to `next` afterwards.
pub fn login_url(next: &str) -> String {
    format!("/login/?next={}", utf8_percent_encode(next, NEXT_PARAM))
}

/// safe_next
///
/// Accepts only local absolute paths as post-login targets. Scheme-relative
/// (`//host`) and absolute URLs are dropped so login cannot redirect off-site.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.starts_with("/\\"))
}

/// LoginRedirect
///
/// Rejection of the `AdminSession` extractor: a redirect to the login page that
/// preserves the originally requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub next: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&login_url(&self.next)).into_response()
    }
}

/// AdminSession Extractor
///
/// Proof that the request carries an authenticated session. Any handler taking it
/// as an argument is gated; unauthenticated requests are bounced to
/// `/login/?next=<path>`.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    // Allows the extractor to verify cookie signatures with the application key.
    Key: FromRef<S>,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = match SignedCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };

        if Session::from_jar(&jar).logged_in {
            return Ok(AdminSession);
        }

        tracing::debug!(path = %parts.uri.path(), "unauthenticated request redirected to login");
        Err(LoginRedirect {
            next: parts.uri.path().to_string(),
        })
    }
}

/// require_admin
///
/// Route-layer middleware wrapping every handler of a router in the `AdminSession`
/// check. The extractor rejects before `next` runs, so wrapped handlers never see
/// an unauthenticated request.
pub async fn require_admin(_admin: AdminSession, request: Request, next: Next) -> Response {
    next.run(request).await
}
