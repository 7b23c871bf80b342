use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo_types::Role;

/// Type of JWT: access or refresh.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    #[serde(alias = "Access")]
    Access,
    #[serde(alias = "Refresh")]
    Refresh,
}

/// JWT payload. The verified identity (role, organization, names) is
/// embedded at sign time, so every request carries it without a store
/// round trip, and role strings are parsed into the closed enum exactly
/// once, here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,                  // user ID
    pub email: String,              // login email
    pub role: Role,                 // ADMIN | TEACHER | STUDENT
    pub org: Uuid,                  // organization ID
    pub first_name: Option<String>, // display name, may be absent
    pub last_name: Option<String>,
    pub iat: usize,      // issued at (unix timestamp)
    pub exp: usize,      // expires at (unix timestamp)
    pub iss: String,     // issuer
    pub aud: String,     // audience
    pub kind: TokenKind, // token type
}
