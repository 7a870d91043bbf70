use chrono::{TimeZone, Utc};
use report_board::models::{
    CreateReportForm, FieldError, NewReport, Report, ValidationError,
};

fn form(
    report_type: Option<&str>,
    location: Option<&str>,
    details: Option<&str>,
    submitted: Option<&str>,
) -> CreateReportForm {
    CreateReportForm {
        report_type: report_type.map(str::to_string),
        location: location.map(str::to_string),
        details: details.map(str::to_string),
        submitted: submitted.map(str::to_string),
    }
}

// --- Tests ---

#[test]
fn test_complete_form_validates() {
    let new_report = form(Some("pothole"), Some("Main St"), Some("big hole"), Some("true"))
        .validate()
        .expect("complete form should validate");

    assert_eq!(new_report.report_type(), "pothole");
    assert_eq!(new_report.location(), "Main St");
    assert_eq!(new_report.details(), "big hole");
    assert!(new_report.submitted());
}

#[test]
fn test_details_are_optional() {
    let new_report = form(Some("graffiti"), Some("Park"), None, Some("on"))
        .validate()
        .unwrap();

    assert_eq!(new_report.details(), "");
}

#[test]
fn test_every_failed_field_is_listed_consent_first() {
    // Every field is missing; all are listed, but consent wins the message.
    let err = form(None, None, None, None).validate().unwrap_err();

    assert_eq!(
        err.errors,
        vec![
            FieldError::Consent,
            FieldError::Required("type"),
            FieldError::Required("location")
        ]
    );
    assert!(err.missing_consent());
    assert_eq!(
        err.to_string(),
        "submitted: consent required, type: required, location: required"
    );
    assert_eq!(
        err.message(),
        "You must agree to the terms and conditions before submitting."
    );
}

#[test]
fn test_falsy_and_unknown_consent_values_fail() {
    for value in ["", "off", "false", "No", "0", "maybe"] {
        let err = form(Some("pothole"), Some("Main St"), None, Some(value))
            .validate()
            .unwrap_err();
        assert_eq!(
            err.errors,
            vec![FieldError::Consent],
            "consent value {:?} should fail alone",
            value
        );
    }
}

#[test]
fn test_truthy_consent_values_pass() {
    for value in ["on", "true", "TRUE", "yes", "y", "1"] {
        assert!(
            form(Some("pothole"), Some("Main St"), None, Some(value))
                .validate()
                .is_ok(),
            "consent value {:?} should pass",
            value
        );
    }
}

#[test]
fn test_blank_required_fields_are_listed() {
    let err = form(Some("   "), None, Some("x"), Some("true"))
        .validate()
        .unwrap_err();

    assert_eq!(
        err.errors,
        vec![FieldError::Required("type"), FieldError::Required("location")]
    );
    assert_eq!(
        err.message(),
        "Please fill out all required fields before submitting."
    );
    assert_eq!(err.to_string(), "type: required, location: required");
}

#[test]
fn test_new_report_rejects_empty_location() {
    let err: ValidationError = NewReport::new("pothole", "", "", true).unwrap_err();
    assert_eq!(err.errors, vec![FieldError::Required("location")]);
}

#[test]
fn test_report_json_uses_type_key() {
    let report = Report {
        id: 1,
        report_type: "pothole".to_string(),
        location: "Main St".to_string(),
        details: String::new(),
        submitted: true,
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
    };

    let json_output = serde_json::to_string(&report).unwrap();
    assert!(json_output.contains(r#""type":"pothole""#));
    assert!(!json_output.contains("report_type"));
    assert_eq!(report.display_time(), "2024-05-01 12:30");
}
