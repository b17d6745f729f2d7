use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::AuthUser,
    error::ApiError,
    products::{dto::ProductRequest, repo_types::Product, services},
    response::{created, ok, EmptyObj, Envelope},
    state::AppState,
};

type Reply<T> = (StatusCode, Json<Envelope<T>>);

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/product", get(list_products).post(create_product))
        .route("/product/", get(list_products).post(create_product))
        .route(
            "/product/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Reply<Vec<Product>>, ApiError> {
    let items = services::list_products(state.products.as_ref(), user_id).await?;
    Ok(ok(items))
}

#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Reply<Product>, ApiError> {
    let Json(payload) = payload?;
    let input = payload.validate()?;
    let product = services::create_product(state.products.as_ref(), user_id, input).await?;
    Ok(created(product))
}

#[instrument(skip(state, id))]
pub async fn get_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Reply<Product>, ApiError> {
    let Path(id) = id?;
    let product = services::get_product(state.products.as_ref(), user_id, id).await?;
    Ok(ok(product))
}

#[instrument(skip(state, id, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Reply<Product>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let input = payload.validate()?;
    let product = services::update_product(state.products.as_ref(), user_id, id, input).await?;
    Ok(ok(product))
}

#[instrument(skip(state, id))]
pub async fn delete_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Reply<EmptyObj>, ApiError> {
    let Path(id) = id?;
    services::delete_product(state.products.as_ref(), user_id, id).await?;
    Ok(ok(EmptyObj {}))
}
