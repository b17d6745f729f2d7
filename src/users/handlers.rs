use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{services::validate_profile, AuthUser},
    db::StoreError,
    error::ApiError,
    response::{ok, Envelope},
    state::AppState,
    users::dto::{PublicUser, UpdateProfileRequest},
};

type UserReply = (StatusCode, Json<Envelope<PublicUser>>);

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/user/profile", get(profile).put(update_profile))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<UserReply, ApiError> {
    // token may outlive its user row
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Authentication("user not found".into()))?;
    Ok(ok(PublicUser::from(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<UserReply, ApiError> {
    let Json(payload) = payload?;
    let (name, email) = validate_profile(&payload.name, &payload.email)?;

    let user = match state.users.update_profile(user_id, &name, &email).await {
        Ok(Some(u)) => u,
        Ok(None) => return Err(ApiError::Authentication("user not found".into())),
        Err(StoreError::Duplicate) => {
            warn!(user_id, "profile update with an email that is already taken");
            return Err(ApiError::Conflict("email already registered".into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id, "profile updated");
    Ok(ok(PublicUser::from(user)))
}
