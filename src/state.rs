use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::jwt::JwtKeys;
use crate::config::{AppConfig, StorageKind};
use crate::db;
use crate::products::{memory::MemoryProductStore, repo::PgProductStore, repo::ProductStore};
use crate::users::{memory::MemoryUserStore, repo::PgUserStore, repo::UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: Arc<JwtKeys>,
    pub users: Arc<dyn UserStore>,
    pub products: Arc<dyn ProductStore>,
}

impl AppState {
    /// Connects the configured backend and runs migrations for Postgres.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        match config.storage {
            StorageKind::Postgres => {
                let pool = db::connect(&config.database_url).await?;
                db::migrate(&pool).await?;
                let users = Arc::new(PgUserStore::new(pool.clone())) as Arc<dyn UserStore>;
                let products = Arc::new(PgProductStore::new(pool)) as Arc<dyn ProductStore>;
                Self::from_parts(config, users, products)
            }
            StorageKind::Memory => {
                tracing::warn!("using in-memory storage; data is lost on restart");
                Self::in_memory(config)
            }
        }
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
    ) -> anyhow::Result<Self> {
        let keys = Arc::new(JwtKeys::new(&config.jwt)?);
        Ok(Self {
            config: Arc::new(config),
            keys,
            users,
            products,
        })
    }

    pub fn in_memory(config: AppConfig) -> anyhow::Result<Self> {
        Self::from_parts(
            config,
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryProductStore::new()),
        )
    }
}

impl FromRef<AppState> for Arc<JwtKeys> {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}
