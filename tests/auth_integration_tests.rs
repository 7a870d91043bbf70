use axum::{
    extract::FromRequestParts,
    http::{
        Request, StatusCode,
        header::{COOKIE, LOCATION, SET_COOKIE},
    },
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};
use report_board::{
    AppConfig, AppError,
    auth::{self, AdminSession, LoginRedirect, SESSION_COOKIE, Session},
    flash::{self, FlashMessage},
};

// --- Helpers ---

fn test_key() -> Key {
    AppConfig::default()
        .cookie_key()
        .expect("default key should be valid")
}

/// Turns the cookies a jar would set into a `Cookie:` request header value.
fn cookie_header(jar: SignedCookieJar) -> String {
    let response = jar.into_response();
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

async fn extract_admin(uri: &str, cookie: Option<&str>) -> Result<AdminSession, LoginRedirect> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let (mut parts, _) = builder.body(()).unwrap().into_parts();

    // `Key` is its own state here: `FromRef<Key> for Key` is the identity.
    let key = test_key();
    AdminSession::from_request_parts(&mut parts, &key).await
}

// --- Tests ---

#[tokio::test]
async fn test_login_with_correct_password_sets_session() {
    let config = AppConfig::default();
    let jar = auth::login(SignedCookieJar::new(test_key()), &config, "secret")
        .expect("correct password should log in");

    assert!(Session::from_jar(&jar).logged_in);

    // The cookie is long-lived (31 days) rather than a browser-session cookie.
    let response = jar.into_response();
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("Max-Age=2678400"));
    assert!(set_cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() {
    let config = AppConfig::default();

    for password in ["Secret", "secret ", "wrong", ""] {
        let result = auth::login(SignedCookieJar::new(test_key()), &config, password);
        assert!(
            matches!(result, Err(AppError::AuthFailure)),
            "password {:?} should be rejected",
            password
        );
    }
}

#[tokio::test]
async fn test_logout_clears_session() {
    let config = AppConfig::default();
    let jar = auth::login(SignedCookieJar::new(test_key()), &config, "secret").unwrap();

    let jar = auth::logout(jar);
    assert!(!Session::from_jar(&jar).logged_in);
}

#[tokio::test]
async fn test_logout_drops_pending_flashes() {
    let config = AppConfig::default();
    let jar = auth::login(SignedCookieJar::new(test_key()), &config, "secret").unwrap();
    let jar = flash::push(jar, FlashMessage::success("pending")).unwrap();
    assert_eq!(flash::peek(&jar).len(), 1);

    let jar = auth::logout(jar);
    assert!(flash::peek(&jar).is_empty());
    assert!(!Session::from_jar(&jar).logged_in);
}

#[tokio::test]
async fn test_logout_expires_cookies_sent_by_the_browser() {
    let config = AppConfig::default();
    let jar = auth::login(SignedCookieJar::new(test_key()), &config, "secret").unwrap();
    let jar = flash::push(jar, FlashMessage::success("pending")).unwrap();
    let cookie = cookie_header(jar);

    // Rebuild the jar from a request, as the logout handler sees it.
    let (parts, _) = Request::builder()
        .header(COOKIE, cookie)
        .body(())
        .unwrap()
        .into_parts();
    let jar = SignedCookieJar::from_headers(&parts.headers, test_key());

    let response = auth::logout(jar).into_response();
    let removed: Vec<&str> = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert!(removed.iter().any(|c| c.starts_with("session=") && c.contains("Max-Age=0")));
    assert!(removed.iter().any(|c| c.starts_with("flash=") && c.contains("Max-Age=0")));
}

#[tokio::test]
async fn test_logout_without_session_is_harmless() {
    let jar = auth::logout(SignedCookieJar::new(test_key()));
    assert!(!Session::from_jar(&jar).logged_in);
}

#[tokio::test]
async fn test_extractor_accepts_logged_in_session() {
    let config = AppConfig::default();
    let jar = auth::login(SignedCookieJar::new(test_key()), &config, "secret").unwrap();
    let cookie = cookie_header(jar);

    assert!(extract_admin("/report/7/", Some(&cookie)).await.is_ok());
}

#[tokio::test]
async fn test_extractor_redirects_without_session() {
    let rejection = extract_admin("/report/7/", None).await.unwrap_err();
    assert_eq!(rejection.next, "/report/7/");

    let response = rejection.into_response();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(LOCATION).unwrap(),
        "/login/?next=/report/7/"
    );
}

#[tokio::test]
async fn test_extractor_ignores_query_string_in_next() {
    let rejection = extract_admin("/report/7/?x=1", None).await.unwrap_err();
    assert_eq!(rejection.next, "/report/7/");
}

#[tokio::test]
async fn test_extractor_rejects_unsigned_session_cookie() {
    // A hand-written cookie without a valid signature must not authenticate.
    let forged = format!("{}={}", SESSION_COOKIE, r#"{"logged_in":true}"#);
    assert!(extract_admin("/report/1/", Some(&forged)).await.is_err());
}

#[tokio::test]
async fn test_extractor_rejects_cookie_signed_with_other_key() {
    let other_key = Key::from(&[7u8; 64]);
    let config = AppConfig::default();
    let jar = auth::login(SignedCookieJar::new(other_key), &config, "secret").unwrap();
    let cookie = cookie_header(jar);

    assert!(extract_admin("/report/1/", Some(&cookie)).await.is_err());
}

#[tokio::test]
async fn test_session_with_logged_in_false_is_rejected() {
    let jar = SignedCookieJar::new(test_key()).add(Cookie::new(
        SESSION_COOKIE,
        r#"{"logged_in":false}"#,
    ));
    let cookie = cookie_header(jar);

    assert!(extract_admin("/report/1/", Some(&cookie)).await.is_err());
}

#[test]
fn test_login_url_encodes_only_what_it_must() {
    assert_eq!(auth::login_url("/report/12/"), "/login/?next=/report/12/");
    assert_eq!(
        auth::login_url("/a b&c=d"),
        "/login/?next=/a%20b%26c%3Dd"
    );
}

#[test]
fn test_safe_next_keeps_local_paths_only() {
    assert_eq!(auth::safe_next(Some("/report/1/")), Some("/report/1/"));
    assert_eq!(auth::safe_next(Some("/")), Some("/"));
    assert_eq!(auth::safe_next(Some("https://evil.example/")), None);
    assert_eq!(auth::safe_next(Some("//evil.example/")), None);
    assert_eq!(auth::safe_next(Some("/\\evil.example")), None);
    assert_eq!(auth::safe_next(Some("")), None);
    assert_eq!(auth::safe_next(None), None);
}
