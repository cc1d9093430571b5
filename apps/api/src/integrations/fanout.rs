use serde::Serialize;
use tracing::warn;

use crate::auth::AuthUser;
use crate::integrations::{active_campaign, google, hubspot, EventProducer, IntegrationKind};
use crate::models::plan::PaymentPlan;
use crate::models::profile::CandidateProfile;
use crate::plans::is_integration_allowed;

/// The producers a fan-out pass may deliver to.
pub struct FanoutProducers<'a> {
    pub google: &'a dyn EventProducer,
    pub active_campaign: &'a dyn EventProducer,
    pub hubspot: &'a dyn EventProducer,
}

/// Per-integration delivery outcome surfaced in the response envelope.
/// `None` means the integration was gated off and never attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FanoutReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_campaign: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hubspot: Option<bool>,
}

/// Decides which integrations a successful write fans out to. An integration
/// runs only when the plan allows it AND the caller's organization toggle for
/// it is on; the marketing sinks additionally require marketing consent on
/// the resulting record.
pub fn fanout_targets(
    plan: &PaymentPlan,
    user: &AuthUser,
    marketing_consent: bool,
) -> Vec<IntegrationKind> {
    let mut targets = Vec::new();

    if is_integration_allowed(IntegrationKind::Google, plan) && user.active_integrations.google {
        targets.push(IntegrationKind::Google);
    }

    if marketing_consent {
        if is_integration_allowed(IntegrationKind::ActiveCampaign, plan)
            && user.active_integrations.active_campaign
        {
            targets.push(IntegrationKind::ActiveCampaign);
        }
        if is_integration_allowed(IntegrationKind::Hubspot, plan)
            && user.active_integrations.hubspot
        {
            targets.push(IntegrationKind::Hubspot);
        }
    }

    targets
}

/// Delivers the profile to every gated-on integration, sequentially. A failed
/// delivery is recorded in the report and logged; it never aborts the request
/// or the remaining deliveries.
pub async fn fan_out(
    producers: FanoutProducers<'_>,
    plan: &PaymentPlan,
    user: &AuthUser,
    profile: &CandidateProfile,
) -> FanoutReport {
    let mut report = FanoutReport::default();

    for kind in fanout_targets(plan, user, profile.marketing_consent) {
        let result = match kind {
            IntegrationKind::Google => {
                google::send_to_google(producers.google, profile, user.organization_id).await
            }
            IntegrationKind::ActiveCampaign => {
                active_campaign::send_to_active_campaign(
                    producers.active_campaign,
                    profile,
                    user.organization_id,
                    &user.active_campaign_tag_name,
                )
                .await
            }
            IntegrationKind::Hubspot => {
                hubspot::send_to_hubspot(
                    producers.hubspot,
                    profile,
                    user.organization_id,
                    &user.active_campaign_tag_name,
                )
                .await
            }
        };

        let delivered = match result {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "{} delivery for profile {} failed: {e:#}",
                    kind.as_str(),
                    profile.id
                );
                false
            }
        };

        match kind {
            IntegrationKind::Google => report.google = Some(delivered),
            IntegrationKind::ActiveCampaign => report.active_campaign = Some(delivered),
            IntegrationKind::Hubspot => report.hubspot = Some(delivered),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ActiveIntegrations;
    use crate::integrations::test_support::RecordingProducer;
    use chrono::Utc;
    use uuid::Uuid;

    fn plan(google: bool, active_campaign: bool, hubspot: bool) -> PaymentPlan {
        PaymentPlan {
            plan_number: 2,
            max_profiles: 100,
            allow_google_integration: google,
            allow_active_campaign_integration: active_campaign,
            allow_hubspot_integration: hubspot,
        }
    }

    fn user(google: bool, active_campaign: bool, hubspot: bool) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            name: "recruiter".into(),
            organization_id: Uuid::new_v4(),
            is_admin_user: false,
            active_integrations: ActiveIntegrations {
                google,
                active_campaign,
                hubspot,
            },
            active_campaign_tag_name: "tag".into(),
        }
    }

    fn profile(marketing_consent: bool) -> CandidateProfile {
        CandidateProfile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            first_name: "Amy".into(),
            last_name: "Nel".into(),
            id_number: "9201010000000".into(),
            email_address: "amy@example.com".into(),
            physical_address: String::new(),
            telephone_number: "0825550000".into(),
            covid19_consent: true,
            marketing_consent,
            username: "recruiter".into(),
            modified_date: Utc::now(),
            version: 1,
            is_deleted: false,
        }
    }

    #[test]
    fn plan_flag_off_gates_integration() {
        let targets = fanout_targets(&plan(false, true, true), &user(true, true, true), true);
        assert_eq!(
            targets,
            vec![IntegrationKind::ActiveCampaign, IntegrationKind::Hubspot]
        );
    }

    #[test]
    fn caller_toggle_off_gates_integration() {
        let targets = fanout_targets(&plan(true, true, true), &user(true, false, true), true);
        assert_eq!(targets, vec![IntegrationKind::Google, IntegrationKind::Hubspot]);
    }

    #[test]
    fn no_marketing_consent_skips_marketing_sinks() {
        let targets = fanout_targets(&plan(true, true, true), &user(true, true, true), false);
        assert_eq!(targets, vec![IntegrationKind::Google]);
    }

    #[test]
    fn everything_gated_off_produces_nothing() {
        assert!(fanout_targets(&plan(false, false, false), &user(true, true, true), true)
            .is_empty());
        assert!(fanout_targets(&plan(true, true, true), &user(false, false, false), true)
            .is_empty());
    }

    #[tokio::test]
    async fn fan_out_records_per_integration_outcomes() {
        let google = RecordingProducer::default();
        let active_campaign = RecordingProducer::failing();
        let hubspot = RecordingProducer::default();

        let report = fan_out(
            FanoutProducers {
                google: &google,
                active_campaign: &active_campaign,
                hubspot: &hubspot,
            },
            &plan(true, true, true),
            &user(true, true, true),
            &profile(true),
        )
        .await;

        assert_eq!(report.google, Some(true));
        assert_eq!(report.active_campaign, Some(false));
        // A failed delivery must not stop the remaining ones.
        assert_eq!(report.hubspot, Some(true));
        assert_eq!(google.event_names(), vec!["GoogleSheetIntegrationEvent"]);
        assert_eq!(hubspot.event_names(), vec!["HubspotIntegrationEvent"]);
    }

    #[tokio::test]
    async fn fan_out_without_consent_never_touches_marketing_producers() {
        let google = RecordingProducer::default();
        let active_campaign = RecordingProducer::default();
        let hubspot = RecordingProducer::default();

        let report = fan_out(
            FanoutProducers {
                google: &google,
                active_campaign: &active_campaign,
                hubspot: &hubspot,
            },
            &plan(true, true, true),
            &user(true, true, true),
            &profile(false),
        )
        .await;

        assert_eq!(report.google, Some(true));
        assert_eq!(report.active_campaign, None);
        assert_eq!(report.hubspot, None);
        assert!(active_campaign.event_names().is_empty());
        assert!(hubspot.event_names().is_empty());
    }
}
