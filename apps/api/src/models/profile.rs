use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted candidate profile. Rows are never physically deleted; delete and
/// undelete toggle `is_deleted` and bump `version`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub id_number: String,
    pub email_address: String,
    pub physical_address: String,
    pub telephone_number: String,
    pub covid19_consent: bool,
    pub marketing_consent: bool,
    pub username: String,
    pub modified_date: DateTime<Utc>,
    pub version: i32,
    pub is_deleted: bool,
}

/// Create request as received on the wire. Every field is optional so that
/// validation can report all missing fields at once instead of failing at
/// deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub physical_address: Option<String>,
    #[serde(default)]
    pub telephone_number: Option<String>,
    #[serde(default)]
    pub covid19_consent: Option<bool>,
    #[serde(default)]
    pub marketing_consent: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub physical_address: Option<String>,
    #[serde(default)]
    pub telephone_number: Option<String>,
    #[serde(default)]
    pub covid19_consent: Option<bool>,
    #[serde(default)]
    pub marketing_consent: Option<bool>,
    #[serde(default)]
    pub version: Option<i64>,
}
