use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::db::StoreError;
use crate::products::{
    repo::ProductStore,
    repo_types::{Product, ProductInput},
};

#[derive(Default)]
struct Rows {
    products: Vec<Product>,
    last_id: i64,
}

/// Process-local [`ProductStore`]; rows are kept in id order.
#[derive(Default)]
pub struct MemoryProductStore {
    rows: Mutex<Rows>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows.products.iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Product>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .products
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, owner_id: i64, input: &ProductInput) -> Result<Product, StoreError> {
        let mut rows = self.rows.lock().await;
        rows.last_id += 1;
        let now = OffsetDateTime::now_utc();
        let product = Product {
            id: rows.last_id,
            name: input.name.clone(),
            price: input.price,
            description: input.description.clone(),
            owner_id,
            created_at: now,
            updated_at: now,
        };
        rows.products.push(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        input: &ProductInput,
    ) -> Result<Option<Product>, StoreError> {
        let mut rows = self.rows.lock().await;
        let Some(product) = rows
            .products
            .iter_mut()
            .find(|p| p.id == id && p.owner_id == owner_id)
        else {
            return Ok(None);
        };
        product.name = input.name.clone();
        product.price = input.price;
        product.description = input.description.clone();
        product.updated_at = OffsetDateTime::now_utc();
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().await;
        let before = rows.products.len();
        rows.products.retain(|p| !(p.id == id && p.owner_id == owner_id));
        Ok(rows.products.len() < before)
    }
}
