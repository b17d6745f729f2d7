//! Product operations scoped to the authenticated owner.
//!
//! Every operation on a single product goes through [`load_owned`]. A product
//! that does not exist and a product owned by someone else produce the same
//! `NotFound`, so callers cannot probe for other users' ids.

use tracing::{info, warn};

use crate::error::ApiError;
use crate::products::{
    repo::ProductStore,
    repo_types::{Product, ProductInput},
};

const NOT_FOUND: &str = "product not found";

/// Loads product `id` if and only if `owner_id` owns it.
pub async fn load_owned(
    products: &dyn ProductStore,
    owner_id: i64,
    id: i64,
) -> Result<Product, ApiError> {
    let product = products
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))?;

    if product.owner_id != owner_id {
        warn!(product_id = id, owner_id = product.owner_id, caller = owner_id, "ownership mismatch");
        return Err(ApiError::NotFound(NOT_FOUND.into()));
    }
    Ok(product)
}

pub async fn list_products(products: &dyn ProductStore, owner_id: i64) -> Result<Vec<Product>, ApiError> {
    Ok(products.list_by_owner(owner_id).await?)
}

pub async fn create_product(
    products: &dyn ProductStore,
    owner_id: i64,
    input: ProductInput,
) -> Result<Product, ApiError> {
    let product = products.insert(owner_id, &input).await?;
    info!(product_id = product.id, owner_id, "product created");
    Ok(product)
}

pub async fn get_product(products: &dyn ProductStore, owner_id: i64, id: i64) -> Result<Product, ApiError> {
    load_owned(products, owner_id, id).await
}

pub async fn update_product(
    products: &dyn ProductStore,
    owner_id: i64,
    id: i64,
    input: ProductInput,
) -> Result<Product, ApiError> {
    load_owned(products, owner_id, id).await?;
    let product = products
        .update(id, owner_id, &input)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))?;
    info!(product_id = id, owner_id, "product updated");
    Ok(product)
}

pub async fn delete_product(products: &dyn ProductStore, owner_id: i64, id: i64) -> Result<(), ApiError> {
    load_owned(products, owner_id, id).await?;
    if !products.delete(id, owner_id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.into()));
    }
    info!(product_id = id, owner_id, "product deleted");
    Ok(())
}
