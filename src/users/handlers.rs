use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{extractors::Identity, password::hash_password, policy::require_role},
    error::ApiError,
    orgs,
    state::AppState,
    users::{
        dto::{
            CreateUserRequest, MeResponse, UpdateMeRequest, UserResponse, UserSummary,
            UsersResponse,
        },
        repo,
        repo_types::Role,
    },
};

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).patch(update_me))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn get_me(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<MeResponse>, ApiError> {
    let user = repo::find_by_id(&state.db, identity.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    // FK guarantees the org row; a miss here is store corruption.
    let organization = orgs::repo::find_by_id(&state.db, user.organization_id)
        .await?
        .ok_or_else(|| ApiError::Internal(anyhow!("organization missing for user")))?;

    Ok(Json(MeResponse {
        ok: true,
        user: user.into(),
        organization: organization.into(),
    }))
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.user_id))]
pub async fn update_me(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let changes = payload.validate()?;

    // The target row is always the caller's own id; the client cannot
    // name another one on this path.
    let user = repo::update_self(&state.db, identity.user_id, &changes)
        .await?
        .ok_or(ApiError::NotFound)?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(UserResponse {
        ok: true,
        user: user.into(),
    }))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id, org_id = %identity.organization_id))]
pub async fn list_users(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<UsersResponse>, ApiError> {
    require_role(&identity, &[Role::Admin])?;

    let users = repo::list_in_org(&state.db, identity.organization_id)
        .await?
        .into_iter()
        .map(UserSummary::from)
        .collect();

    Ok(Json(UsersResponse { ok: true, users }))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id, org_id = %identity.organization_id))]
pub async fn get_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    require_role(&identity, &[Role::Admin])?;

    let id: Uuid = id
        .parse()
        .map_err(|_| ApiError::invalid("id: must be a valid user id"))?;

    // Scoped to the caller's org in the query itself; an id from another
    // organization is indistinguishable from an absent one.
    let user = repo::find_in_org(&state.db, id, identity.organization_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(UserResponse {
        ok: true,
        user: user.into(),
    }))
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.user_id, org_id = %identity.organization_id))]
pub async fn create_user(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    require_role(&identity, &[Role::Admin])?;

    let new = payload.validate()?;

    // Fast-path duplicate check before paying for a hash; the unique
    // constraint on email stays authoritative if this races.
    if repo::find_by_email(&state.db, &new.email).await?.is_some() {
        warn!("email already registered");
        return Err(ApiError::Conflict);
    }

    let hash = hash_password(&new.temp_password)?;

    let user = repo::create_in_org(
        &state.db,
        identity.organization_id,
        identity.user_id,
        &new,
        &hash,
    )
    .await?;

    info!(created_id = %user.id, role = ?user.role, creator_email = %identity.email, "user created");
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            ok: true,
            user: user.into(),
        }),
    ))
}
