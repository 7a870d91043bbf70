use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// --- Core Application Schemas (Mapped to Database) ---

/// Report
///
/// A single incident submitted through the public form, stored in the `report` table.
/// Rows are written once by the create handler and never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default, PartialEq)]
pub struct Report {
    pub id: i64,

    // 'type' is a reserved keyword in Rust, so the column is renamed for internal use.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub report_type: String,

    pub location: String,
    pub details: String,

    // Consent flag; only accepted (submitted) reports are listed publicly.
    pub submitted: bool,

    pub timestamp: DateTime<Utc>,
}

/// NewReport
///
/// A creation payload whose required fields are known to be non-blank.
/// The store only accepts this type, so an empty `type` or `location` never reaches SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    report_type: String,
    location: String,
    details: String,
    submitted: bool,
}

impl NewReport {
    pub fn new(
        report_type: impl Into<String>,
        location: impl Into<String>,
        details: impl Into<String>,
        submitted: bool,
    ) -> Result<Self, ValidationError> {
        let report_type = report_type.into();
        let location = location.into();

        let mut errors = Vec::new();
        if report_type.trim().is_empty() {
            errors.push(FieldError::Required("type"));
        }
        if location.trim().is_empty() {
            errors.push(FieldError::Required("location"));
        }
        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }

        Ok(Self {
            report_type,
            location,
            details: details.into(),
            submitted,
        })
    }

    pub fn report_type(&self) -> &str {
        &self.report_type
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }
}

// --- Request Payloads (Input Schemas) ---

/// CreateReportForm
///
/// Raw urlencoded body of `POST /create/`. Every field is optional at this stage;
/// `validate` converts it into a `NewReport` or a `ValidationError`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CreateReportForm {
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    pub location: Option<String>,
    pub details: Option<String>,
    pub submitted: Option<String>,
}

impl CreateReportForm {
    /// validate
    ///
    /// Every failed field is listed, the consent flag first.
    pub fn validate(&self) -> Result<NewReport, ValidationError> {
        let mut errors = Vec::new();
        if parse_consent(self.submitted.as_deref()) != Some(true) {
            errors.push(FieldError::Consent);
        }

        let checked = NewReport::new(
            self.report_type.clone().unwrap_or_default(),
            self.location.clone().unwrap_or_default(),
            self.details.clone().unwrap_or_default(),
            true,
        );

        match checked {
            Ok(new_report) if errors.is_empty() => Ok(new_report),
            Ok(_) => Err(ValidationError { errors }),
            Err(e) => {
                errors.extend(e.errors);
                Err(ValidationError { errors })
            }
        }
    }
}

/// Parses a checkbox-style flag. `None` means the value was present but unrecognised.
fn parse_consent(raw: Option<&str>) -> Option<bool> {
    let Some(raw) = raw else {
        return Some(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "y" | "1" => Some(true),
        "" | "off" | "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// LoginForm
///
/// Body of `POST /login/`. `next` mirrors the hidden field rendered by the login page.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoginForm {
    pub password: Option<String>,
    pub next: Option<String>,
}

/// NextParam
///
/// The `?next=` query parameter set by the auth guard when it bounces a request to login.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct NextParam {
    pub next: Option<String>,
}

// --- Validation ---

/// A single failed field in a submitted form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The terms-and-conditions checkbox (`submitted`) was absent, unchecked, or unreadable.
    Consent,
    /// A required text field was absent or blank.
    Required(&'static str),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Consent => write!(f, "submitted: consent required"),
            FieldError::Required(field) => write!(f, "{}: required", field),
        }
    }
}

/// ValidationError
///
/// Lists exactly which fields of a form failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn missing_consent(&self) -> bool {
        self.errors.contains(&FieldError::Consent)
    }

    /// The user-facing message flashed when the create form is rejected.
    pub fn message(&self) -> &'static str {
        if self.missing_consent() {
            "You must agree to the terms and conditions before submitting."
        } else {
            "Please fill out all required fields before submitting."
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", fields.join(", "))
    }
}

impl std::error::Error for ValidationError {}
