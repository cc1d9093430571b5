use serde_json::Value;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::integrations::fanout::{self, FanoutProducers, FanoutReport};
use crate::models::profile::{CandidateProfile, CreateProfileRequest, UpdateProfileRequest};
use crate::models::response::ApiResponse;
use crate::plans;
use crate::profile::{mapping, repository, validation};
use crate::state::AppState;

/// Orchestration of the five profile operations:
/// validate -> map -> persist -> (create/update only) plan gate + fan-out ->
/// response envelope. Failures propagate as typed errors; the handlers turn
/// them into failure envelopes.

pub async fn create(
    state: &AppState,
    req: CreateProfileRequest,
    user: &AuthUser,
    request_id: &str,
) -> Result<ApiResponse, AppError> {
    validation::validate_create(&req, user)?;

    let draft = mapping::draft_from_create(&req);
    let profile = repository::create(&state.db, state.audit.as_ref(), draft, user).await?;

    let report = fan_out_after_write(state, user, &profile).await?;

    Ok(ApiResponse::success(
        request_id,
        "CandidateProfile create request success",
        Some(profile_value(&profile)),
    )
    .with_integrations(report))
}

pub async fn update(
    state: &AppState,
    req: UpdateProfileRequest,
    user: &AuthUser,
    request_id: &str,
) -> Result<ApiResponse, AppError> {
    validation::validate_update(&req, user)?;

    let id = parse_record_id(req.id.as_deref().unwrap_or_default())?;
    let version = req
        .version
        .and_then(|v| i32::try_from(v).ok())
        .filter(|v| *v > 0)
        .ok_or_else(|| AppError::Validation("The object version is not valid".to_string()))?;

    let draft = mapping::draft_from_update(&req);
    let profile =
        repository::update(&state.db, state.audit.as_ref(), id, version, draft, user).await?;

    let report = fan_out_after_write(state, user, &profile).await?;

    Ok(ApiResponse::success(
        request_id,
        "CandidateProfile update request success",
        Some(profile_value(&profile)),
    )
    .with_integrations(report))
}

pub async fn delete(
    state: &AppState,
    id: &str,
    user: &AuthUser,
    request_id: &str,
) -> Result<ApiResponse, AppError> {
    validation::validate_id(id, user)?;
    let id = parse_record_id(id)?;

    repository::delete(&state.db, state.audit.as_ref(), id, user).await?;

    Ok(ApiResponse::success(
        request_id,
        "CandidateProfile delete request success",
        None,
    ))
}

pub async fn undelete(
    state: &AppState,
    id: &str,
    user: &AuthUser,
    request_id: &str,
) -> Result<ApiResponse, AppError> {
    validation::validate_id(id, user)?;
    let id = parse_record_id(id)?;

    repository::undelete(&state.db, state.audit.as_ref(), id, user).await?;

    Ok(ApiResponse::success(
        request_id,
        "CandidateProfile undelete request success",
        None,
    ))
}

#[allow(clippy::too_many_arguments)]
pub async fn lookup(
    state: &AppState,
    id: Option<String>,
    search: &str,
    start: i64,
    limit: i64,
    user: &AuthUser,
    request_id: &str,
    admin_scope: bool,
) -> Result<ApiResponse, AppError> {
    validation::validate_lookup(id.as_deref(), user)?;

    let id = match id.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => Some(parse_record_id(raw)?),
        None => None,
    };

    let rows = repository::lookup(&state.db, id, search, start, limit, user, admin_scope).await?;

    if rows.is_empty() {
        return Err(AppError::NoData);
    }

    Ok(ApiResponse::success(
        request_id,
        "CandidateProfile lookup request success",
        Some(serde_json::to_value(&rows).unwrap_or(Value::Null)),
    ))
}

/// Fan-out runs only after the write has committed. The per-integration
/// outcomes go into the envelope; a failed delivery never fails the request.
async fn fan_out_after_write(
    state: &AppState,
    user: &AuthUser,
    profile: &CandidateProfile,
) -> Result<FanoutReport, AppError> {
    let plan = plans::get_payment_plan(&state.db, user).await?;

    Ok(fanout::fan_out(
        FanoutProducers {
            google: state.google.as_ref(),
            active_campaign: state.active_campaign.as_ref(),
            hubspot: state.hubspot.as_ref(),
        },
        &plan,
        user,
        profile,
    )
    .await)
}

fn parse_record_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::Validation("The id property is not valid".to_string()))
}

fn profile_value(profile: &CandidateProfile) -> Value {
    serde_json::to_value(profile).unwrap_or(Value::Null)
}
