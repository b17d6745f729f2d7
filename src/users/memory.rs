use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::db::StoreError;
use crate::users::{repo::UserStore, repo_types::User};

#[derive(Default)]
struct Rows {
    users: Vec<User>,
    last_id: i64,
}

/// Process-local [`UserStore`] for tests and `STORAGE=memory` runs.
#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Rows>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, name: &str, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut rows = self.rows.lock().await;
        if rows.users.iter().any(|u| u.email == email) {
            return Err(StoreError::Duplicate);
        }
        rows.last_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: rows.last_id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        rows.users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: i64,
        name: &str,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let mut rows = self.rows.lock().await;
        if rows.users.iter().any(|u| u.email == email && u.id != id) {
            return Err(StoreError::Duplicate);
        }
        let Some(user) = rows.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.name = name.to_string();
        user.email = email.to_string();
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }
}
