use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{CredentialStore, StoreError};
use crate::{auth::types::User, password};

/// Process-local store, used when no database is configured and in tests.
#[derive(Debug)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, User>>,
    bcrypt_cost: u32,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new(bcrypt_cost: u32) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            bcrypt_cost,
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<User, StoreError> {
        // Hash before taking the write lock; bcrypt is slow on purpose.
        let password_hash = password::hash(password.to_string(), self.bcrypt_cost).await?;

        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(StoreError::Conflict);
        }

        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            password_hash,
        };
        users.insert(username.to_string(), user.clone());

        debug!("stored user {} in memory", user.id);

        Ok(user)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
