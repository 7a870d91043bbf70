use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Body served for every 404, whether from the router fallback or a missing report.
pub const NOT_FOUND_BODY: &str = "<h2>Error 404: Not Found</h2>";

/// AppError
///
/// The error taxonomy of the board. `AuthFailure` is normally recovered inside the
/// login handler and turned into a flashed message; the `IntoResponse` mapping
/// below is the fallback when it escapes. Form validation failures are a separate
/// type (`models::ValidationError`) that only the create handler consumes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("incorrect password")]
    AuthFailure,

    #[error("not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, Html(NOT_FOUND_BODY)).into_response(),
            AppError::AuthFailure => {
                (StatusCode::UNAUTHORIZED, "Incorrect password.").into_response()
            }
            AppError::Database(e) => {
                tracing::error!("database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            AppError::Template(e) => {
                tracing::error!("template render error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            AppError::Serialization(e) => {
                tracing::error!("cookie serialization error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            AppError::Config(msg) => {
                tracing::error!("configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
