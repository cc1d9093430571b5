pub mod active_campaign;
pub mod audit;
pub mod fanout;
pub mod google;
pub mod hubspot;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::profile::CandidateProfile;

/// The outbound integrations a plan can enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationKind {
    Google,
    ActiveCampaign,
    Hubspot,
}

impl IntegrationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationKind::Google => "google",
            IntegrationKind::ActiveCampaign => "activeCampaign",
            IntegrationKind::Hubspot => "hubspot",
        }
    }
}

/// Versioned, timestamped, named event envelope accepted by every downstream
/// producer endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub object_id: Uuid,
    pub event_name: String,
    pub version: i32,
    pub data: Value,
    pub produced_at: DateTime<Utc>,
}

impl EventEnvelope {
    pub fn new(event_name: impl Into<String>, version: i32, data: Value) -> Self {
        EventEnvelope {
            object_id: Uuid::new_v4(),
            event_name: event_name.into(),
            version,
            data,
            produced_at: Utc::now(),
        }
    }
}

/// Seam for the downstream event endpoints so the workflow can be exercised
/// with recording producers in tests.
#[async_trait]
pub trait EventProducer: Send + Sync {
    async fn produce(&self, event: EventEnvelope) -> Result<()>;
}

/// Producer that POSTs the event envelope as JSON to a fixed endpoint.
pub struct HttpEventProducer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpEventProducer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        HttpEventProducer {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl EventProducer for HttpEventProducer {
    async fn produce(&self, event: EventEnvelope) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&event)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "event endpoint {} rejected {} with status {}",
                self.endpoint,
                event.event_name,
                response.status()
            );
        }

        Ok(())
    }
}

/// Normalized contact payload shared by the ActiveCampaign and Hubspot
/// exporters.
pub fn contact_payload(profile: &CandidateProfile, organization_id: Uuid, tag_name: &str) -> Value {
    json!({
        "firstName": profile.first_name,
        "lastName": profile.last_name,
        "email": profile.email_address,
        "phone": profile.telephone_number,
        "organizationId": organization_id,
        "activeCampaignTagName": tag_name,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use super::*;

    /// Records produced events; optionally fails every call.
    #[derive(Default)]
    pub struct RecordingProducer {
        pub events: Mutex<Vec<EventEnvelope>>,
        pub fail: bool,
    }

    impl RecordingProducer {
        pub fn failing() -> Self {
            RecordingProducer {
                events: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn event_names(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.event_name.clone())
                .collect()
        }
    }

    #[async_trait]
    impl EventProducer for RecordingProducer {
        async fn produce(&self, event: EventEnvelope) -> Result<()> {
            self.events.lock().unwrap().push(event);
            if self.fail {
                anyhow::bail!("producer unavailable");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_profile() -> CandidateProfile {
        CandidateProfile {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            organization_id: Uuid::nil(),
            first_name: "Thandi".into(),
            last_name: "Mokoena".into(),
            id_number: "9001015009087".into(),
            email_address: "thandi@example.com".into(),
            physical_address: "12 Long St".into(),
            telephone_number: "0821234567".into(),
            covid19_consent: true,
            marketing_consent: true,
            username: "recruiter1".into(),
            modified_date: Utc.with_ymd_and_hms(2021, 3, 4, 8, 5, 9).unwrap(),
            version: 1,
            is_deleted: false,
        }
    }

    #[test]
    fn envelope_serializes_camel_case() {
        let event = EventEnvelope::new("CandidateProfileCreatedEvent", 1, json!({}));
        let value = serde_json::to_value(&event).unwrap();
        assert!(value.get("objectId").is_some());
        assert!(value.get("eventName").is_some());
        assert!(value.get("producedAt").is_some());
    }

    #[test]
    fn contact_payload_carries_tag_and_org() {
        let org = Uuid::new_v4();
        let payload = contact_payload(&sample_profile(), org, "winter-drive");
        assert_eq!(payload["firstName"], "Thandi");
        assert_eq!(payload["phone"], "0821234567");
        assert_eq!(payload["organizationId"], org.to_string());
        assert_eq!(payload["activeCampaignTagName"], "winter-drive");
    }
}
