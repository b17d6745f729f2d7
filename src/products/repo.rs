use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::StoreError;
use crate::products::repo_types::{Product, ProductInput};

/// Product persistence. Reads are unscoped so [`crate::products::services`]
/// can tell a foreign row from a missing one for logging; writes only touch
/// rows owned by `owner_id`.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, StoreError>;
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Product>, StoreError>;
    async fn insert(&self, owner_id: i64, input: &ProductInput) -> Result<Product, StoreError>;
    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        input: &ProductInput,
    ) -> Result<Option<Product>, StoreError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i64, owner_id: i64) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgProductStore {
    db: PgPool,
}

impl PgProductStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, description, owner_id, created_at, updated_at
              FROM products
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, description, owner_id, created_at, updated_at
              FROM products
             WHERE owner_id = $1
             ORDER BY id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert(&self, owner_id: i64, input: &ProductInput) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, description, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(owner_id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        input: &ProductInput,
    ) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
               SET name = $3, price = $4, description = $5, updated_at = now()
             WHERE id = $1 AND owner_id = $2
            RETURNING id, name, price, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM products WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
