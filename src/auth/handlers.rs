use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        services::{register_user, verify_credential},
    },
    error::ApiError,
    response::{created, ok, Envelope},
    state::AppState,
    users::repo_types::User,
};

type AuthReply = (StatusCode, Json<Envelope<AuthResponse>>);

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

fn with_token(state: &AppState, user: User) -> Result<AuthResponse, ApiError> {
    let token = state.keys.generate_token(user.id)?;
    Ok(AuthResponse {
        user: user.into(),
        token,
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<AuthReply, ApiError> {
    let Json(payload) = payload?;
    let user = register_user(state.users.as_ref(), payload).await?;
    Ok(created(with_token(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<AuthReply, ApiError> {
    let Json(payload) = payload?;
    let user = verify_credential(state.users.as_ref(), &payload.email, &payload.password).await?;
    info!(user_id = user.id, "user logged in");
    Ok(ok(with_token(&state, user)?))
}
