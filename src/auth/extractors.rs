use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::auth::claims::{Claims, TokenKind};
use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;
use crate::users::repo_types::Role;

/// The verified caller: who is asking, with which role, in which
/// organization. Derived once per request from the bearer token and
/// passed explicitly into every operation.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub organization_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Identity {
    /// Pure projection from verified claims; no side effects.
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            organization_id: claims.org,
            first_name: claims.first_name,
            last_name: claims.last_name,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(_) => {
                warn!("invalid or expired token");
                return Err(ApiError::Unauthorized);
            }
        };

        if claims.kind != TokenKind::Access {
            return Err(ApiError::Unauthorized);
        }

        Ok(Identity::from_claims(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::test_user;
    use crate::state::AppState;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/me");
        if let Some(v) = value {
            builder = builder.header(axum::http::header::AUTHORIZATION, v);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn extracts_identity_from_access_token() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let user = test_user(Role::Teacher);
        let token = keys.sign_access(&user).unwrap();

        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let identity = Identity::from_request_parts(&mut parts, &state)
            .await
            .expect("valid token extracts");
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.role, Role::Teacher);
        assert_eq!(identity.organization_id, user.organization_id);
        assert_eq!(identity.email, user.email);
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(None);
        let err = Identity::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        let err = Identity::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(Some("Bearer not.a.jwt"));
        let err = Identity::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn refresh_token_cannot_authenticate_requests() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let token = keys.sign_refresh(&test_user(Role::Admin)).unwrap();

        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let err = Identity::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }
}
