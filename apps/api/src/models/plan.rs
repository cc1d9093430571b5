use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Subscription plan record. Read-only to this service; owned by the billing
/// system.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlan {
    pub plan_number: i32,
    pub max_profiles: i64,
    pub allow_google_integration: bool,
    pub allow_active_campaign_integration: bool,
    pub allow_hubspot_integration: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub payment_plan: i32,
}
