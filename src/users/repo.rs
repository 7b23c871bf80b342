//! Organization scoping lives in the query predicates here, not in
//! post-hoc checks: a row outside the caller's organization is never
//! fetched in the first place.

use sqlx::PgPool;
use uuid::Uuid;

use crate::users::dto::{NewUser, ProfileChanges};
use crate::users::repo_types::User;

/// All users of one organization, admins first, newest first within a
/// role group. Fresh query per call.
pub async fn list_in_org(db: &PgPool, org_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, first_name, last_name, role,
               organization_id, created_by_user_id, created_at, updated_at
        FROM users
        WHERE organization_id = $1
        ORDER BY role ASC, created_at DESC
        "#,
    )
    .bind(org_id)
    .fetch_all(db)
    .await
}

/// A user only if it belongs to the given organization. A cross-org id
/// yields None, indistinguishable from an absent one.
pub async fn find_in_org(
    db: &PgPool,
    user_id: Uuid,
    org_id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, first_name, last_name, role,
               organization_id, created_by_user_id, created_at, updated_at
        FROM users
        WHERE id = $1 AND organization_id = $2
        "#,
    )
    .bind(user_id)
    .bind(org_id)
    .fetch_optional(db)
    .await
}

/// Unscoped lookup; used by the refresh path and the self-profile path only.
pub async fn find_by_id(db: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, first_name, last_name, role,
               organization_id, created_by_user_id, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// Unscoped lookup by exact email; login and the duplicate pre-check.
pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, first_name, last_name, role,
               organization_id, created_by_user_id, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await
}

/// Insert a user into the creator's own organization. The organization
/// and creator columns come from the verified caller identity, never
/// from client input.
pub async fn create_in_org(
    db: &PgPool,
    org_id: Uuid,
    creator_id: Uuid,
    new: &NewUser,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash, first_name, last_name, role,
                           organization_id, created_by_user_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, email, password_hash, first_name, last_name, role,
                  organization_id, created_by_user_id, created_at, updated_at
        "#,
    )
    .bind(&new.email)
    .bind(password_hash)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(new.role)
    .bind(org_id)
    .bind(creator_id)
    .fetch_one(db)
    .await
}

/// Update the caller's own display names. The target row is always the
/// caller's id; no other id can reach this statement.
pub async fn update_self(
    db: &PgPool,
    user_id: Uuid,
    changes: &ProfileChanges,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET first_name = COALESCE($2, first_name),
            last_name  = COALESCE($3, last_name),
            updated_at = now()
        WHERE id = $1
        RETURNING id, email, password_hash, first_name, last_name, role,
                  organization_id, created_by_user_id, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(&changes.first_name)
    .bind(&changes.last_name)
    .fetch_optional(db)
    .await
}
