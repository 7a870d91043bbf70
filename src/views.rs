use askama::Template;
use axum::response::Html;

use crate::{error::AppError, flash::FlashMessage, models::Report};

// Every page extends `base.html`, which renders the navigation and pending flashes.

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub flashes: Vec<FlashMessage>,
    pub logged_in: bool,
    pub reports: Vec<Report>,
}

#[derive(Template)]
#[template(path = "create.html")]
pub struct CreateTemplate {
    pub flashes: Vec<FlashMessage>,
    pub logged_in: bool,
    // Values re-filled into the form after a rejected submission.
    pub report_type: String,
    pub location: String,
    pub details: String,
}

#[derive(Template)]
#[template(path = "detail.html")]
pub struct DetailTemplate {
    pub flashes: Vec<FlashMessage>,
    pub logged_in: bool,
    pub report: Report,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub flashes: Vec<FlashMessage>,
    pub logged_in: bool,
    // Empty when there is nowhere to return to.
    pub next_url: String,
}

#[derive(Template)]
#[template(path = "logout.html")]
pub struct LogoutTemplate {
    pub flashes: Vec<FlashMessage>,
    pub logged_in: bool,
}

pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

impl Report {
    /// Timestamp as shown in listings and on the detail page.
    pub fn display_time(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M").to_string()
    }
}
