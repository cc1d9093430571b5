use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::profile::{CreateProfileRequest, UpdateProfileRequest};

/// Request-shape validation. Each function aggregates every violated rule
/// into one multi-line message instead of stopping at the first failure.

pub fn validate_create(req: &CreateProfileRequest, user: &AuthUser) -> Result<(), AppError> {
    if user.id.is_nil() {
        return Err(AppError::Validation(
            "Request and user object cannot be empty".to_string(),
        ));
    }

    let mut violations = Vec::new();
    collect_common_violations(req, &mut violations);
    finish(violations)
}

pub fn validate_update(req: &UpdateProfileRequest, user: &AuthUser) -> Result<(), AppError> {
    if user.id.is_nil() {
        return Err(AppError::Validation(
            "Request and user object cannot be empty".to_string(),
        ));
    }

    let mut violations = Vec::new();

    if !is_valid_id(req.id.as_deref()) {
        violations.push("The id property is not valid".to_string());
    }

    let common = CreateProfileRequest {
        request_id: req.request_id.clone(),
        first_name: req.first_name.clone(),
        last_name: req.last_name.clone(),
        id_number: req.id_number.clone(),
        email_address: req.email_address.clone(),
        physical_address: req.physical_address.clone(),
        telephone_number: req.telephone_number.clone(),
        covid19_consent: req.covid19_consent,
        marketing_consent: req.marketing_consent,
    };
    collect_common_violations(&common, &mut violations);

    if !matches!(req.version, Some(v) if v > 0) {
        violations.push("The object version is not valid".to_string());
    }

    finish(violations)
}

/// Shared by delete and undelete: the id and the user identity must both be
/// present, then the id must be a syntactically valid record reference.
pub fn validate_id(id: &str, user: &AuthUser) -> Result<(), AppError> {
    if id.is_empty() || user.id.is_nil() {
        return Err(AppError::Validation(
            "ID and user object cannot be empty".to_string(),
        ));
    }

    if Uuid::parse_str(id).is_err() {
        return Err(AppError::Validation("The id property is not valid".to_string()));
    }

    Ok(())
}

/// Lookup accepts an absent id (list shapes); a supplied id must parse.
pub fn validate_lookup(id: Option<&str>, user: &AuthUser) -> Result<(), AppError> {
    if user.id.is_nil() {
        return Err(AppError::Validation("User object cannot be empty".to_string()));
    }

    match id {
        Some(raw) if !raw.is_empty() && Uuid::parse_str(raw).is_err() => Err(
            AppError::Validation("The id property is not valid".to_string()),
        ),
        _ => Ok(()),
    }
}

fn collect_common_violations(req: &CreateProfileRequest, violations: &mut Vec<String>) {
    if is_blank(&req.request_id) {
        violations.push("The request id needs to be supplied".to_string());
    }
    if is_blank(&req.first_name) {
        violations.push("The candidate first name needs to be supplied".to_string());
    }
    if is_blank(&req.last_name) {
        violations.push("The candidate last name needs to be supplied".to_string());
    }
    if is_blank(&req.id_number) {
        violations.push("The candidate ID number needs to be supplied".to_string());
    }
    if req
        .telephone_number
        .as_deref()
        .map_or(true, |t| t.is_empty() || t.chars().count() < 10)
    {
        violations.push("The candidate telephone number is invalid".to_string());
    }
    // Consent flags must be explicitly present; false is a valid answer.
    if req.covid19_consent.is_none() {
        violations.push("The Covid 19 consent value should be supplied".to_string());
    }
    if req.marketing_consent.is_none() {
        violations.push("The marketing consent value should be supplied".to_string());
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}

fn is_valid_id(id: Option<&str>) -> bool {
    matches!(id, Some(raw) if !raw.is_empty() && Uuid::parse_str(raw).is_ok())
}

fn finish(violations: Vec<String>) -> Result<(), AppError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(violations.join("\n")))
    }
}
