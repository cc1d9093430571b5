use sqlx::PgPool;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::integrations::IntegrationKind;
use crate::models::plan::{Organization, PaymentPlan};

/// Resolves the caller's payment plan via its organization record.
pub async fn get_payment_plan(pool: &PgPool, user: &AuthUser) -> Result<PaymentPlan, AppError> {
    let organization: Option<Organization> =
        sqlx::query_as("SELECT id, name, payment_plan FROM organizations WHERE id = $1")
            .bind(user.organization_id)
            .fetch_optional(pool)
            .await?;

    let organization =
        organization.ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;

    let plan: Option<PaymentPlan> = sqlx::query_as(
        r#"
        SELECT plan_number, max_profiles,
               allow_google_integration,
               allow_active_campaign_integration,
               allow_hubspot_integration
        FROM payment_plans
        WHERE plan_number = $1
        "#,
    )
    .bind(organization.payment_plan)
    .fetch_optional(pool)
    .await?;

    plan.ok_or_else(|| AppError::NotFound("Payment plan not found".to_string()))
}

/// Pure lookup of the plan's allow flag for an integration kind.
pub fn is_integration_allowed(kind: IntegrationKind, plan: &PaymentPlan) -> bool {
    match kind {
        IntegrationKind::Google => plan.allow_google_integration,
        IntegrationKind::ActiveCampaign => plan.allow_active_campaign_integration,
        IntegrationKind::Hubspot => plan.allow_hubspot_integration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(google: bool, active_campaign: bool, hubspot: bool) -> PaymentPlan {
        PaymentPlan {
            plan_number: 1,
            max_profiles: 5,
            allow_google_integration: google,
            allow_active_campaign_integration: active_campaign,
            allow_hubspot_integration: hubspot,
        }
    }

    #[test]
    fn each_flag_gates_its_own_kind() {
        let p = plan(true, false, true);
        assert!(is_integration_allowed(IntegrationKind::Google, &p));
        assert!(!is_integration_allowed(IntegrationKind::ActiveCampaign, &p));
        assert!(is_integration_allowed(IntegrationKind::Hubspot, &p));
    }

    #[test]
    fn all_flags_off_denies_everything() {
        let p = plan(false, false, false);
        assert!(!is_integration_allowed(IntegrationKind::Google, &p));
        assert!(!is_integration_allowed(IntegrationKind::ActiveCampaign, &p));
        assert!(!is_integration_allowed(IntegrationKind::Hubspot, &p));
    }
}
