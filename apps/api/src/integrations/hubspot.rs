use anyhow::Result;
use uuid::Uuid;

use crate::integrations::{contact_payload, EventEnvelope, EventProducer};
use crate::models::profile::CandidateProfile;

pub async fn send_to_hubspot(
    producer: &dyn EventProducer,
    profile: &CandidateProfile,
    organization_id: Uuid,
    tag_name: &str,
) -> Result<()> {
    // The Hubspot producer reuses the ActiveCampaign tag name.
    let event = EventEnvelope::new(
        "HubspotIntegrationEvent",
        1,
        contact_payload(profile, organization_id, tag_name),
    );

    producer.produce(event).await
}
