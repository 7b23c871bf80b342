use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::orgs::repo::Organization;
use crate::users::repo_types::{Role, User};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 255;
const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 128;

/// Body for POST /users.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub temp_password: String,
}

/// Admitted create-user input. Role is guaranteed TEACHER or STUDENT.
#[derive(Debug)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub temp_password: String,
}

impl CreateUserRequest {
    /// All field errors are collected so the 400 body reports every
    /// violation at once.
    pub fn validate(self) -> Result<NewUser, ApiError> {
        let mut details = Vec::new();

        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        if first_name.is_empty() || first_name.chars().count() > NAME_MAX {
            details.push(format!("firstName: must be between 1 and {NAME_MAX} characters"));
        }
        if last_name.is_empty() || last_name.chars().count() > NAME_MAX {
            details.push(format!("lastName: must be between 1 and {NAME_MAX} characters"));
        }

        let email = self.email.trim().to_string();
        if !is_valid_email(&email) || email.chars().count() > EMAIL_MAX {
            details.push("email: must be a valid email address".to_string());
        }

        // Admins are seeded out of band, never created through the API.
        if !matches!(self.role, Role::Teacher | Role::Student) {
            details.push("role: must be TEACHER or STUDENT".to_string());
        }

        let len = self.temp_password.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
            details.push(format!(
                "tempPassword: must be between {PASSWORD_MIN} and {PASSWORD_MAX} characters"
            ));
        }

        if !details.is_empty() {
            return Err(ApiError::InvalidInput { details });
        }

        Ok(NewUser {
            first_name,
            last_name,
            email,
            role: self.role,
            temp_password: self.temp_password,
        })
    }
}

/// Body for PATCH /me.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Writable self-profile fields, trimmed, with empty-after-trim values
/// dropped. At least one field is guaranteed present.
#[derive(Debug)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UpdateMeRequest {
    /// An absent-everything payload is a schema failure; a payload whose
    /// fields all trim to empty is the distinct "nothing to update" case.
    pub fn validate(self) -> Result<ProfileChanges, ApiError> {
        if self.first_name.is_none() && self.last_name.is_none() {
            return Err(ApiError::invalid("at least one field must be provided"));
        }

        let mut details = Vec::new();
        for (name, value) in [
            ("firstName", self.first_name.as_deref()),
            ("lastName", self.last_name.as_deref()),
        ] {
            if let Some(v) = value {
                if v.is_empty() || v.chars().count() > NAME_MAX {
                    details.push(format!("{name}: must be between 1 and {NAME_MAX} characters"));
                }
            }
        }
        if !details.is_empty() {
            return Err(ApiError::InvalidInput { details });
        }

        let first_name = self
            .first_name
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let last_name = self
            .last_name
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        if first_name.is_none() && last_name.is_none() {
            return Err(ApiError::NothingToUpdate);
        }

        Ok(ProfileChanges {
            first_name,
            last_name,
        })
    }
}

/// Outward user representation. The only shape that crosses the trust
/// boundary; the credential hash does not exist on this type.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub organization_id: Uuid,
    pub created_by_user_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role,
            organization_id: u.organization_id,
            created_by_user_id: u.created_by_user_id,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrganizationRef {
    pub id: Uuid,
    pub name: String,
}

impl From<Organization> for OrganizationRef {
    fn from(o: Organization) -> Self {
        Self {
            id: o.id,
            name: o.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub ok: bool,
    pub user: UserSummary,
    pub organization: OrganizationRef,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub ok: bool,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub ok: bool,
    pub users: Vec<UserSummary>,
}
