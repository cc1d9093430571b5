use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::profile::{CreateProfileRequest, UpdateProfileRequest};
use crate::models::response::ApiResponse;
use crate::profile::workflow;
use crate::state::AppState;

/// Transport adapters: unwrap the request, run the workflow, convert every
/// error into a failure envelope. Nothing propagates past this layer.

/// POST /api/v1/createcandidateprofile
pub async fn handle_create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateProfileRequest>,
) -> ApiResponse {
    let request_id = req.request_id.clone().unwrap_or_default();
    if request_id.trim().is_empty() {
        return missing_request_id();
    }

    match workflow::create(&state, req, &user, &request_id).await {
        Ok(response) => response,
        Err(e) => {
            error!("create candidate profile request {request_id} failed: {e}");
            ApiResponse::from_error(request_id, &e)
        }
    }
}

/// PUT /api/v1/updatecandidateprofile
pub async fn handle_update(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResponse {
    let request_id = req.request_id.clone().unwrap_or_default();
    if request_id.trim().is_empty() {
        return missing_request_id();
    }

    match workflow::update(&state, req, &user, &request_id).await {
        Ok(response) => response,
        Err(e) => {
            error!("update candidate profile request {request_id} failed: {e}");
            ApiResponse::from_error(request_id, &e)
        }
    }
}

/// DELETE /api/v1/deletecandidateprofile/:requestId/:id
///
/// The only operation with an explicit role check: soft delete is restricted
/// to admin callers.
pub async fn handle_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((request_id, id)): Path<(String, String)>,
) -> ApiResponse {
    if request_id.trim().is_empty() {
        return missing_request_id();
    }
    if id.trim().is_empty() {
        return missing_id(request_id);
    }
    if !user.is_admin_user {
        return ApiResponse::failure(
            request_id,
            StatusCode::FORBIDDEN,
            "The user does not have the correct roles to access this functionality",
        );
    }

    match workflow::delete(&state, &id, &user, &request_id).await {
        Ok(response) => response,
        Err(e) => {
            error!("delete candidate profile request {request_id} failed: {e}");
            ApiResponse::from_error(request_id, &e)
        }
    }
}

/// DELETE /api/v1/undeletecandidateprofile/:requestId/:id
pub async fn handle_undelete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((request_id, id)): Path<(String, String)>,
) -> ApiResponse {
    if request_id.trim().is_empty() {
        return missing_request_id();
    }
    if id.trim().is_empty() {
        return missing_id(request_id);
    }

    match workflow::undelete(&state, &id, &user, &request_id).await {
        Ok(response) => response,
        Err(e) => {
            error!("undelete candidate profile request {request_id} failed: {e}");
            ApiResponse::from_error(request_id, &e)
        }
    }
}

/// GET /api/v1/candidateprofilelookup/:requestId/:start/:limit/:isAdmin
pub async fn handle_lookup(
    State(state): State<AppState>,
    user: AuthUser,
    Path((request_id, start, limit, is_admin)): Path<(String, String, String, String)>,
) -> ApiResponse {
    lookup_impl(state, user, request_id, start, limit, is_admin, None, None).await
}

/// GET /api/v1/candidateprofilelookup/:requestId/:start/:limit/:isAdmin/:searchString
pub async fn handle_lookup_search(
    State(state): State<AppState>,
    user: AuthUser,
    Path((request_id, start, limit, is_admin, search)): Path<(
        String,
        String,
        String,
        String,
        String,
    )>,
) -> ApiResponse {
    lookup_impl(state, user, request_id, start, limit, is_admin, Some(search), None).await
}

/// GET /api/v1/candidateprofilelookup/:requestId/:start/:limit/:isAdmin/:searchString/:id
pub async fn handle_lookup_search_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((request_id, start, limit, is_admin, search, id)): Path<(
        String,
        String,
        String,
        String,
        String,
        String,
    )>,
) -> ApiResponse {
    lookup_impl(
        state,
        user,
        request_id,
        start,
        limit,
        is_admin,
        Some(search),
        Some(id),
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn lookup_impl(
    state: AppState,
    user: AuthUser,
    request_id: String,
    start: String,
    limit: String,
    is_admin: String,
    search: Option<String>,
    id: Option<String>,
) -> ApiResponse {
    if request_id.trim().is_empty() {
        return missing_request_id();
    }

    let (start, limit) = clamp_paging(&start, &limit);
    let admin_scope = is_admin == "true";
    let search = search.unwrap_or_default();

    match workflow::lookup(
        &state,
        id,
        &search,
        start,
        limit,
        &user,
        &request_id,
        admin_scope,
    )
    .await
    {
        Ok(response) => response,
        Err(e) => {
            error!("candidate profile lookup request {request_id} failed: {e}");
            ApiResponse::from_error(request_id, &e)
        }
    }
}

/// Unparseable or out-of-range paging degrades to the defaults instead of
/// failing the request: start 0, limit 1.
fn clamp_paging(start: &str, limit: &str) -> (i64, i64) {
    let start = start.parse::<i64>().ok().filter(|s| *s >= 0).unwrap_or(0);
    let limit = limit.parse::<i64>().ok().filter(|l| *l >= 1).unwrap_or(1);
    (start, limit)
}

fn missing_request_id() -> ApiResponse {
    ApiResponse::failure(
        Uuid::new_v4().to_string(),
        StatusCode::BAD_REQUEST,
        "The candidateprofile requestId cannot be empty",
    )
}

fn missing_id(request_id: String) -> ApiResponse {
    ApiResponse::failure(
        request_id,
        StatusCode::BAD_REQUEST,
        "The candidateprofile id parameter cannot be empty",
    )
}
