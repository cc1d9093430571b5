use serde_json::Value;
use tracing::warn;

use crate::integrations::{EventEnvelope, EventProducer};
use crate::models::profile::CandidateProfile;

/// Emits an audit event carrying the full post-mutation record. The mutation
/// has already committed by the time this runs, so a producer failure is
/// logged rather than surfaced to the caller.
pub async fn emit(
    producer: &dyn EventProducer,
    event_name: &str,
    profile: &CandidateProfile,
) {
    let data = serde_json::to_value(profile).unwrap_or(Value::Null);
    let event = EventEnvelope::new(event_name, profile.version, data);

    if let Err(e) = producer.produce(event).await {
        warn!("audit event {event_name} for profile {} failed: {e:#}", profile.id);
    }
}
