use crate::models::profile::{CreateProfileRequest, UpdateProfileRequest};

/// Business fields of a profile as supplied by the caller. Identifier,
/// ownership, version and delete state are stamped server-side and never
/// taken from the payload.
#[derive(Debug, Clone)]
pub struct ProfileDraft {
    pub first_name: String,
    pub last_name: String,
    pub id_number: String,
    pub email_address: String,
    pub physical_address: String,
    pub telephone_number: String,
    pub covid19_consent: bool,
    pub marketing_consent: bool,
}

/// Maps a validated create request into a draft. Optional contact fields that
/// validation does not require default to empty.
pub fn draft_from_create(req: &CreateProfileRequest) -> ProfileDraft {
    ProfileDraft {
        first_name: req.first_name.clone().unwrap_or_default(),
        last_name: req.last_name.clone().unwrap_or_default(),
        id_number: req.id_number.clone().unwrap_or_default(),
        email_address: req.email_address.clone().unwrap_or_default(),
        physical_address: req.physical_address.clone().unwrap_or_default(),
        telephone_number: req.telephone_number.clone().unwrap_or_default(),
        covid19_consent: req.covid19_consent.unwrap_or_default(),
        marketing_consent: req.marketing_consent.unwrap_or_default(),
    }
}

pub fn draft_from_update(req: &UpdateProfileRequest) -> ProfileDraft {
    ProfileDraft {
        first_name: req.first_name.clone().unwrap_or_default(),
        last_name: req.last_name.clone().unwrap_or_default(),
        id_number: req.id_number.clone().unwrap_or_default(),
        email_address: req.email_address.clone().unwrap_or_default(),
        physical_address: req.physical_address.clone().unwrap_or_default(),
        telephone_number: req.telephone_number.clone().unwrap_or_default(),
        covid19_consent: req.covid19_consent.unwrap_or_default(),
        marketing_consent: req.marketing_consent.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_mapping_carries_business_fields() {
        let req = CreateProfileRequest {
            request_id: Some("req-1".into()),
            first_name: Some("Thandi".into()),
            last_name: Some("Mokoena".into()),
            id_number: Some("9001015009087".into()),
            email_address: None,
            physical_address: None,
            telephone_number: Some("0821234567".into()),
            covid19_consent: Some(true),
            marketing_consent: Some(false),
        };
        let draft = draft_from_create(&req);
        assert_eq!(draft.first_name, "Thandi");
        assert_eq!(draft.id_number, "9001015009087");
        assert_eq!(draft.email_address, "");
        assert!(draft.covid19_consent);
        assert!(!draft.marketing_consent);
    }
}
