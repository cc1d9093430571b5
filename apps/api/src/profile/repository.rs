use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::integrations::{audit, EventProducer};
use crate::models::profile::CandidateProfile;
use crate::plans;
use crate::profile::mapping::ProfileDraft;

/// Persistence for candidate profiles. All queries are scoped to the caller's
/// organization; rows are never physically deleted. Concurrent writers are
/// detected through compare-and-swap on `version`.

/// Creates a profile after enforcing the plan quota and the per-organization
/// id-number uniqueness among live rows. The store assigns the identifier;
/// version starts at 1.
pub async fn create(
    pool: &PgPool,
    audit_producer: &dyn EventProducer,
    draft: ProfileDraft,
    user: &AuthUser,
) -> Result<CandidateProfile, AppError> {
    ensure_quota(pool, user).await?;

    let duplicate: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM candidate_profiles
            WHERE organization_id = $1 AND id_number = $2 AND is_deleted = FALSE
        )
        "#,
    )
    .bind(user.organization_id)
    .bind(&draft.id_number)
    .fetch_one(pool)
    .await?;

    if duplicate {
        return Err(AppError::DuplicateIdNumber);
    }

    let profile: CandidateProfile = sqlx::query_as(
        r#"
        INSERT INTO candidate_profiles
            (user_id, organization_id, first_name, last_name, id_number,
             email_address, physical_address, telephone_number,
             covid19_consent, marketing_consent, username, modified_date,
             version, is_deleted)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 1, FALSE)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(user.organization_id)
    .bind(&draft.first_name)
    .bind(&draft.last_name)
    .bind(&draft.id_number)
    .bind(&draft.email_address)
    .bind(&draft.physical_address)
    .bind(&draft.telephone_number)
    .bind(draft.covid19_consent)
    .bind(draft.marketing_consent)
    .bind(&user.name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(map_unique_violation)?;

    info!("created candidate profile {} in organization {}", profile.id, profile.organization_id);
    audit::emit(audit_producer, "CandidateProfileCreatedEvent", &profile).await;

    Ok(profile)
}

/// Updates the mutable business fields of a live profile. The stored version
/// must not be ahead of the caller's; the stale writer loses and must re-read.
pub async fn update(
    pool: &PgPool,
    audit_producer: &dyn EventProducer,
    id: Uuid,
    version: i32,
    draft: ProfileDraft,
    user: &AuthUser,
) -> Result<CandidateProfile, AppError> {
    let existing: Option<CandidateProfile> = sqlx::query_as(
        r#"
        SELECT * FROM candidate_profiles
        WHERE id = $1 AND organization_id = $2 AND is_deleted = FALSE
        "#,
    )
    .bind(id)
    .bind(user.organization_id)
    .fetch_optional(pool)
    .await?;

    let existing = existing.ok_or_else(|| {
        AppError::NotFound(
            "Record does not exist in database or the record has been deleted".to_string(),
        )
    })?;

    if version_conflict(existing.version, version) {
        return Err(AppError::VersionConflict);
    }

    // Compare-and-swap on the version read above; identifier and ownership
    // columns are never overwritten.
    let updated: Option<CandidateProfile> = sqlx::query_as(
        r#"
        UPDATE candidate_profiles
        SET first_name = $1, last_name = $2, email_address = $3,
            physical_address = $4, telephone_number = $5,
            covid19_consent = $6, marketing_consent = $7,
            version = $8, username = $9, modified_date = $10
        WHERE id = $11 AND version = $12
        RETURNING *
        "#,
    )
    .bind(&draft.first_name)
    .bind(&draft.last_name)
    .bind(&draft.email_address)
    .bind(&draft.physical_address)
    .bind(&draft.telephone_number)
    .bind(draft.covid19_consent)
    .bind(draft.marketing_consent)
    .bind(existing.version + 1)
    .bind(&user.name)
    .bind(Utc::now())
    .bind(id)
    .bind(existing.version)
    .fetch_optional(pool)
    .await?;

    let profile = updated.ok_or(AppError::VersionConflict)?;

    audit::emit(audit_producer, "CandidateProfileUpdatedEvent", &profile).await;

    Ok(profile)
}

pub async fn delete(
    pool: &PgPool,
    audit_producer: &dyn EventProducer,
    id: Uuid,
    user: &AuthUser,
) -> Result<CandidateProfile, AppError> {
    set_deleted(pool, audit_producer, id, user, true).await
}

/// Restoring a profile counts against the plan quota the same way creating
/// one does.
pub async fn undelete(
    pool: &PgPool,
    audit_producer: &dyn EventProducer,
    id: Uuid,
    user: &AuthUser,
) -> Result<CandidateProfile, AppError> {
    ensure_quota(pool, user).await?;
    set_deleted(pool, audit_producer, id, user, false).await
}

async fn set_deleted(
    pool: &PgPool,
    audit_producer: &dyn EventProducer,
    id: Uuid,
    user: &AuthUser,
    deleted: bool,
) -> Result<CandidateProfile, AppError> {
    // No is_deleted filter here: delete may target an already-deleted row and
    // undelete must reach deleted rows.
    let existing: Option<CandidateProfile> = sqlx::query_as(
        "SELECT * FROM candidate_profiles WHERE id = $1 AND organization_id = $2",
    )
    .bind(id)
    .bind(user.organization_id)
    .fetch_optional(pool)
    .await?;

    let existing = existing
        .ok_or_else(|| AppError::NotFound("Record does not exist in database".to_string()))?;

    let updated: Option<CandidateProfile> = sqlx::query_as(
        r#"
        UPDATE candidate_profiles
        SET is_deleted = $1, version = $2, username = $3, modified_date = $4
        WHERE id = $5 AND version = $6
        RETURNING *
        "#,
    )
    .bind(deleted)
    .bind(existing.version + 1)
    .bind(&user.name)
    .bind(Utc::now())
    .bind(id)
    .bind(existing.version)
    .fetch_optional(pool)
    .await
    // Undelete can collide with a live row that reused the id number.
    .map_err(map_unique_violation)?;

    let profile = updated.ok_or(AppError::VersionConflict)?;

    let event_name = if deleted {
        "CandidateProfileDeletedEvent"
    } else {
        "CandidateProfileUndeletedEvent"
    };
    audit::emit(audit_producer, event_name, &profile).await;

    Ok(profile)
}

/// The four mutually exclusive lookup shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupShape {
    /// Point lookup, organization-scoped, live rows only.
    ById(Uuid),
    /// Admin acting in admin scope with no search string: every live row in
    /// the organization.
    OrganizationListing,
    /// Admin acting in non-admin scope with no search string: only rows the
    /// caller owns.
    OwnListing,
    /// Everything else: organization-scoped exact match on id number.
    IdNumberSearch(String),
}

/// An absent search string arrives as `""` or a lone `" "`; anything else is
/// matched verbatim, surrounding whitespace included.
pub fn normalize_search(raw: &str) -> &str {
    if raw == " " {
        ""
    } else {
        raw
    }
}

pub fn lookup_shape(
    id: Option<Uuid>,
    search: &str,
    user: &AuthUser,
    admin_scope: bool,
) -> LookupShape {
    if let Some(id) = id {
        return LookupShape::ById(id);
    }

    if user.is_admin_user && admin_scope && search.is_empty() {
        LookupShape::OrganizationListing
    } else if user.is_admin_user && !admin_scope && search.is_empty() {
        LookupShape::OwnListing
    } else {
        LookupShape::IdNumberSearch(search.to_string())
    }
}

/// Runs the lookup. An empty result is not an error at this layer; the
/// workflow decides how to report it. All list shapes share the same stable
/// ordering and skip/limit pagination.
pub async fn lookup(
    pool: &PgPool,
    id: Option<Uuid>,
    search: &str,
    start: i64,
    limit: i64,
    user: &AuthUser,
    admin_scope: bool,
) -> Result<Vec<CandidateProfile>, AppError> {
    let search = normalize_search(search);
    let rows: Vec<CandidateProfile> = match lookup_shape(id, search, user, admin_scope) {
        LookupShape::ById(id) => {
            sqlx::query_as(
                r#"
                SELECT * FROM candidate_profiles
                WHERE id = $1 AND organization_id = $2 AND is_deleted = FALSE
                ORDER BY last_name ASC, first_name ASC
                OFFSET $3 LIMIT $4
                "#,
            )
            .bind(id)
            .bind(user.organization_id)
            .bind(start)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        LookupShape::OrganizationListing => {
            sqlx::query_as(
                r#"
                SELECT * FROM candidate_profiles
                WHERE organization_id = $1 AND is_deleted = FALSE
                ORDER BY last_name ASC, first_name ASC
                OFFSET $2 LIMIT $3
                "#,
            )
            .bind(user.organization_id)
            .bind(start)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        LookupShape::OwnListing => {
            sqlx::query_as(
                r#"
                SELECT * FROM candidate_profiles
                WHERE user_id = $1 AND is_deleted = FALSE
                ORDER BY last_name ASC, first_name ASC
                OFFSET $2 LIMIT $3
                "#,
            )
            .bind(user.id)
            .bind(start)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        LookupShape::IdNumberSearch(id_number) => {
            sqlx::query_as(
                r#"
                SELECT * FROM candidate_profiles
                WHERE organization_id = $1 AND id_number = $2
                ORDER BY last_name ASC, first_name ASC
                OFFSET $3 LIMIT $4
                "#,
            )
            .bind(user.organization_id)
            .bind(id_number)
            .bind(start)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}

/// Rejects the mutation when the organization's live profile count has
/// reached the plan limit. Applies to create and undelete.
async fn ensure_quota(pool: &PgPool, user: &AuthUser) -> Result<(), AppError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM candidate_profiles WHERE organization_id = $1 AND is_deleted = FALSE",
    )
    .bind(user.organization_id)
    .fetch_one(pool)
    .await?;

    let plan = plans::get_payment_plan(pool, user).await?;

    if quota_reached(count, plan.max_profiles) {
        return Err(AppError::QuotaExceeded);
    }

    Ok(())
}

/// A stale writer is one whose supplied version lags the stored one; a writer
/// at (or somehow ahead of) the stored version proceeds into the
/// compare-and-swap.
fn version_conflict(stored: i32, supplied: i32) -> bool {
    stored > supplied
}

/// Create and undelete are both capped by the plan: the mutation that would
/// take the live count past `max_profiles` is rejected.
fn quota_reached(live_count: i64, max_profiles: i64) -> bool {
    live_count >= max_profiles
}

/// The partial unique index on `(organization_id, id_number)` over live rows
/// backstops the pre-check under concurrent writers; its violation is the
/// duplicate business error, not an infrastructure failure.
fn map_unique_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            AppError::DuplicateIdNumber
        }
        _ => AppError::Database(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ActiveIntegrations;

    fn user(is_admin: bool) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            name: "recruiter".into(),
            organization_id: Uuid::new_v4(),
            is_admin_user: is_admin,
            active_integrations: ActiveIntegrations::default(),
            active_campaign_tag_name: String::new(),
        }
    }

    #[test]
    fn id_wins_over_every_other_shape() {
        let id = Uuid::new_v4();
        let shape = lookup_shape(Some(id), "search", &user(true), true);
        assert_eq!(shape, LookupShape::ById(id));
    }

    #[test]
    fn admin_in_admin_scope_lists_organization() {
        assert_eq!(
            lookup_shape(None, "", &user(true), true),
            LookupShape::OrganizationListing
        );
        // A lone space counts as an absent search string.
        assert_eq!(
            lookup_shape(None, normalize_search(" "), &user(true), true),
            LookupShape::OrganizationListing
        );
    }

    #[test]
    fn search_values_are_matched_verbatim() {
        assert_eq!(normalize_search(" "), "");
        assert_eq!(normalize_search(""), "");
        // Only the lone-space sentinel is normalized; real input keeps its
        // whitespace and is matched as supplied.
        assert_eq!(normalize_search(" 123 "), " 123 ");
        assert_eq!(
            lookup_shape(None, " 123 ", &user(true), true),
            LookupShape::IdNumberSearch(" 123 ".into())
        );
    }

    #[test]
    fn admin_outside_admin_scope_lists_own_records() {
        assert_eq!(
            lookup_shape(None, "", &user(true), false),
            LookupShape::OwnListing
        );
    }

    #[test]
    fn search_string_forces_id_number_search() {
        assert_eq!(
            lookup_shape(None, "9001015009087", &user(true), true),
            LookupShape::IdNumberSearch("9001015009087".into())
        );
    }

    #[test]
    fn non_admin_with_empty_search_falls_through_to_search() {
        // Non-admins never get a listing; an empty search matches nothing,
        // which the workflow reports as no data.
        assert_eq!(
            lookup_shape(None, "", &user(false), false),
            LookupShape::IdNumberSearch(String::new())
        );
    }

    #[test]
    fn quota_rejects_at_the_plan_limit_and_allows_below_it() {
        // With max_profiles = 5, the fifth live profile is the last one
        // allowed in; the mutation attempted at a count of 5 is rejected.
        assert!(!quota_reached(0, 5));
        assert!(!quota_reached(4, 5));
        assert!(quota_reached(5, 5));
        assert!(quota_reached(6, 5));
    }

    #[test]
    fn stale_writer_always_conflicts_regardless_of_payload() {
        assert!(version_conflict(2, 1));
        assert!(version_conflict(10, 3));
        // A writer holding the current version proceeds to the
        // compare-and-swap.
        assert!(!version_conflict(2, 2));
        assert!(!version_conflict(2, 3));
    }

    #[test]
    fn non_unique_database_errors_stay_infrastructure_errors() {
        let mapped = map_unique_violation(sqlx::Error::PoolClosed);
        assert!(matches!(mapped, AppError::Database(_)));
    }
}
