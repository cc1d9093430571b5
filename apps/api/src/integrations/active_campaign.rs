use anyhow::Result;
use uuid::Uuid;

use crate::integrations::{contact_payload, EventEnvelope, EventProducer};
use crate::models::profile::CandidateProfile;

pub async fn send_to_active_campaign(
    producer: &dyn EventProducer,
    profile: &CandidateProfile,
    organization_id: Uuid,
    tag_name: &str,
) -> Result<()> {
    let event = EventEnvelope::new(
        "ActiveCampaignIntegrationEvent",
        1,
        contact_payload(profile, organization_id, tag_name),
    );

    producer.produce(event).await
}
