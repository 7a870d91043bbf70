use crate::{
    AppState,
    auth::{self, Session},
    error::AppError,
    flash::{self, FlashMessage},
    models::{CreateReportForm, LoginForm, NextParam},
    views::{
        self, CreateTemplate, DetailTemplate, IndexTemplate, LoginTemplate, LogoutTemplate,
    },
};
use axum::{
    Form,
    extract::{Path, Query, State, rejection::FormRejection},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;

/// Pops pending flashes and reads the login flag, the two things every page needs.
fn page_context(jar: SignedCookieJar) -> (SignedCookieJar, Vec<FlashMessage>, bool) {
    let (jar, flashes) = flash::take(jar);
    let logged_in = Session::from_jar(&jar).logged_in;
    (jar, flashes, logged_in)
}

// --- Handlers ---

/// index
///
/// [Public Route] Lists every accepted report, most recent first, in a single page.
pub async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Html<String>), AppError> {
    let reports = state.repo.accepted().await?;
    let (jar, flashes, logged_in) = page_context(jar);

    let page = views::render(&IndexTemplate {
        flashes,
        logged_in,
        reports,
    })?;
    Ok((jar, page))
}

/// create_form
///
/// [Public Route] The empty submission form.
pub async fn create_form(
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Html<String>), AppError> {
    let (jar, flashes, logged_in) = page_context(jar);

    let page = views::render(&CreateTemplate {
        flashes,
        logged_in,
        report_type: String::new(),
        location: String::new(),
        details: String::new(),
    })?;
    Ok((jar, page))
}

/// create_report
///
/// [Public Route] Handles a submission. A rejected form is re-rendered with the
/// entered values and a danger message; nothing is written to the store.
/// An accepted one is persisted and the browser is sent to the report's detail
/// page when the stored report is flagged `submitted`, otherwise back to the form.
pub async fn create_report(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    form: Result<Form<CreateReportForm>, FormRejection>,
) -> Result<Response, AppError> {
    // A body that is not urlencoded carries no fields, so it fails validation like an empty form.
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable report submission");
            CreateReportForm::default()
        }
    };

    let new_report = match form.validate() {
        Ok(new_report) => new_report,
        Err(e) => {
            tracing::info!(errors = %e, "report submission rejected");
            let (jar, mut flashes, logged_in) = page_context(jar);
            flashes.push(FlashMessage::danger(e.message()));

            let page = views::render(&CreateTemplate {
                flashes,
                logged_in,
                report_type: form.report_type.unwrap_or_default(),
                location: form.location.unwrap_or_default(),
                details: form.details.unwrap_or_default(),
            })?;
            return Ok((jar, page).into_response());
        }
    };

    let report = state.repo.create(new_report).await?;
    let jar = flash::push(jar, FlashMessage::success("Entry created successfully."))?;

    let target = if report.submitted {
        format!("/report/{}/", report.id)
    } else {
        "/create/".to_string()
    };
    Ok((jar, Redirect::to(&target)).into_response())
}

/// detail
///
/// [Authenticated Route] One report. Ids that do not parse as integers are treated
/// the same as ids with no row: 404. The session check is the `require_admin` layer.
pub async fn detail(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<String>,
) -> Result<(SignedCookieJar, Html<String>), AppError> {
    let id: i64 = id.parse().map_err(|_| AppError::NotFound)?;
    let report = state.repo.get_by_id(id).await?;
    let (jar, flashes, logged_in) = page_context(jar);

    let page = views::render(&DetailTemplate {
        flashes,
        logged_in,
        report,
    })?;
    Ok((jar, page))
}

/// login_form
///
/// [Public Route] The password form. `?next=` is carried through a hidden field.
pub async fn login_form(
    jar: SignedCookieJar,
    Query(query): Query<NextParam>,
) -> Result<(SignedCookieJar, Html<String>), AppError> {
    let next_url = auth::safe_next(query.next.as_deref())
        .unwrap_or_default()
        .to_string();
    let (jar, flashes, logged_in) = page_context(jar);

    let page = views::render(&LoginTemplate {
        flashes,
        logged_in,
        next_url,
    })?;
    Ok((jar, page))
}

/// login
///
/// [Public Route] Attempts a login. `next` comes from the query string first, then
/// from the form. A blank password just re-renders the form.
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<NextParam>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let next_url = auth::safe_next(
        query
            .next
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(form.next.as_deref()),
    )
    .map(str::to_string);

    let mut failure = None;
    let password = form.password.as_deref().unwrap_or_default();
    if !password.is_empty() {
        match auth::login(jar.clone(), &state.config, password) {
            Ok(jar) => {
                let jar = flash::push(jar, FlashMessage::success("You are now logged in."))?;
                let target = next_url.as_deref().unwrap_or("/");
                return Ok((jar, Redirect::to(target)).into_response());
            }
            Err(AppError::AuthFailure) => {
                failure = Some(FlashMessage::danger("Incorrect password."));
            }
            Err(e) => return Err(e),
        }
    }

    let (jar, mut flashes, logged_in) = page_context(jar);
    flashes.extend(failure);

    let page = views::render(&LoginTemplate {
        flashes,
        logged_in,
        next_url: next_url.unwrap_or_default(),
    })?;
    Ok((jar, page).into_response())
}

/// logout_form
///
/// [Public Route] Confirmation page; logging out only happens on POST.
pub async fn logout_form(
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Html<String>), AppError> {
    let (jar, flashes, logged_in) = page_context(jar);

    let page = views::render(&LogoutTemplate { flashes, logged_in })?;
    Ok((jar, page))
}

/// logout
///
/// [Public Route] Clears the session and returns to the listing.
pub async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, Redirect) {
    tracing::info!("admin logged out");
    (auth::logout(jar), Redirect::to("/"))
}

/// not_found
///
/// Router fallback for every unmatched path.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
