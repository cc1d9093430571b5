use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::integrations::{EventEnvelope, EventProducer};
use crate::models::profile::CandidateProfile;

/// Sheet tab the exporter appends to.
pub const SHEET_NAME: &str = "Contacts";

/// Timestamp format used in the exported row.
pub fn format_modified(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Row of normalized string fields appended to the sheet. Field order is part
/// of the downstream contract.
pub fn sheet_row(profile: &CandidateProfile) -> Vec<String> {
    vec![
        profile.id.to_string(),
        profile.first_name.clone(),
        profile.last_name.clone(),
        profile.id_number.clone(),
        profile.telephone_number.clone(),
        profile.email_address.clone(),
        profile.physical_address.clone(),
        yes_no(profile.marketing_consent),
        yes_no(profile.covid19_consent),
        profile.username.clone(),
        format_modified(&profile.modified_date),
    ]
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

pub async fn send_to_google(
    producer: &dyn EventProducer,
    profile: &CandidateProfile,
    organization_id: Uuid,
) -> Result<()> {
    let event = EventEnvelope::new(
        "GoogleSheetIntegrationEvent",
        1,
        json!({
            "sheetName": SHEET_NAME,
            "values": sheet_row(profile),
            "organizationId": organization_id,
        }),
    );

    producer.produce(event).await
}
