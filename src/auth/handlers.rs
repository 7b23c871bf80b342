use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RefreshRequest},
        jwt::JwtKeys,
        password::verify_password,
    },
    error::ApiError,
    state::AppState,
    users::{dto::is_valid_email, repo},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// Unknown email and wrong password produce the same 401 so the login
/// endpoint cannot be used to probe for accounts.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_string();

    if !is_valid_email(&payload.email) {
        warn!("invalid login email");
        return Err(ApiError::invalid("email: must be a valid email address"));
    }

    let user = match repo::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!("login unknown email");
            return Err(ApiError::Unauthorized);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized);
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(&user)?;
    let refresh_token = keys.sign_refresh(&user)?;

    info!(user_id = %user.id, org_id = %user.organization_id, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

/// Issues a fresh token pair. The user row is re-read so a role or name
/// change since the last issue lands in the new claims.
#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| ApiError::Unauthorized)?;

    let user = repo::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let access_token = keys.sign_access(&user)?;
    let refresh_token = keys.sign_refresh(&user)?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::test_user;
    use crate::users::repo_types::Role;

    #[test]
    fn auth_response_serializes_sanitized_user() {
        let user = test_user(Role::Teacher);
        let response = AuthResponse {
            access_token: "a.b.c".into(),
            refresh_token: "d.e.f".into(),
            user: user.into(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("access_token"));
        assert!(json.contains("someone@school.example"));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }
}
