use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Closed role set. Raw role strings only exist inside token and row
/// deserialization; everything downstream compares this enum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2 hash, not exposed in JSON
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub organization_id: Uuid,
    pub created_by_user_id: Option<Uuid>, // null for the bootstrap admin
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_as_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"TEACHER\"");
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"STUDENT\"");
    }

    #[test]
    fn role_rejects_lowercase() {
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }

    #[test]
    fn user_row_never_serializes_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "teacher@example.org".into(),
            password_hash: "$argon2id$not-a-real-hash".into(),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            role: Role::Teacher,
            organization_id: Uuid::new_v4(),
            created_by_user_id: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2"));
    }
}
