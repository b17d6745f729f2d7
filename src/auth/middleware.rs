use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::{extractors::AuthUser, jwt::JwtKeys, jwt::TokenError};
use crate::error::ApiError;

/// Gate for protected routers: validates the bearer token and stores the
/// subject as [`AuthUser`] in the request extensions. Nothing downstream runs
/// on failure.
pub async fn require_auth(
    State(keys): State<Arc<JwtKeys>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let outcome = match req.headers().get(AUTHORIZATION) {
        None => Err(TokenError::Missing),
        Some(value) => match value.to_str() {
            Ok(raw) => keys.validate_token(Some(raw)),
            Err(_) => Err(TokenError::Malformed),
        },
    };

    let user_id = outcome.map_err(|e| {
        warn!(error = %e, method = %req.method(), uri = %req.uri(), "request rejected");
        e
    })?;

    req.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn keys() -> Arc<JwtKeys> {
        Arc::new(JwtKeys::new(&JwtConfig {
            secret: "mw-secret".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_minutes: 5,
        })
        .unwrap())
    }

    fn app(keys: Arc<JwtKeys>, reached: Arc<AtomicBool>) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(move |AuthUser(id): AuthUser| {
                    let reached = reached.clone();
                    async move {
                        reached.store(true, Ordering::SeqCst);
                        id.to_string()
                    }
                }),
            )
            .route_layer(from_fn_with_state(keys, require_auth))
    }

    #[tokio::test]
    async fn missing_header_halts_pipeline() {
        let reached = Arc::new(AtomicBool::new(false));
        let res = app(keys(), reached.clone())
            .oneshot(HttpRequest::get("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn invalid_token_halts_pipeline() {
        let reached = Arc::new(AtomicBool::new(false));
        let res = app(keys(), reached.clone())
            .oneshot(
                HttpRequest::get("/whoami")
                    .header(AUTHORIZATION, "Bearer garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn valid_token_exposes_subject_to_handler() {
        let keys = keys();
        let token = keys.generate_token(99).unwrap();
        let reached = Arc::new(AtomicBool::new(false));
        let res = app(keys, reached.clone())
            .oneshot(
                HttpRequest::get("/whoami")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(reached.load(Ordering::SeqCst));
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"99");
    }

    #[tokio::test]
    async fn extractor_without_layer_fails_closed() {
        let app = Router::new().route("/whoami", get(|AuthUser(id): AuthUser| async move { id.to_string() }));
        let res = app
            .oneshot(HttpRequest::get("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
