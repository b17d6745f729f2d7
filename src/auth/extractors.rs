use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::jwt::TokenError;
use crate::error::ApiError;

/// Subject id of the validated bearer token, placed in the request
/// extensions by [`super::middleware::require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| TokenError::Missing.into())
    }
}
