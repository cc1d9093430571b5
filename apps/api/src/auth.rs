use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Response;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;

/// Header carrying the authenticated-user document. JWT validation happens at
/// the gateway; by the time a request reaches this service the gateway has
/// already verified the token and serialized the claims into this header.
pub const USER_HEADER: &str = "x-authenticated-user";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveIntegrations {
    #[serde(default)]
    pub google: bool,
    #[serde(default)]
    pub active_campaign: bool,
    #[serde(default)]
    pub hubspot: bool,
}

/// Authenticated caller context, as asserted by the gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub organization_id: Uuid,
    #[serde(default)]
    pub is_admin_user: bool,
    /// Per-organization toggles for the outbound integrations.
    #[serde(default)]
    pub active_integrations: ActiveIntegrations,
    #[serde(default)]
    pub active_campaign_tag_name: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                warn!("request rejected: missing {USER_HEADER} header");
                axum::response::IntoResponse::into_response(AppError::Unauthorized)
            })?;

        serde_json::from_str(raw).map_err(|e| {
            warn!("request rejected: malformed {USER_HEADER} header: {e}");
            axum::response::IntoResponse::into_response(AppError::Unauthorized)
        })
    }
}
