//! Credential store adapters.
//!
//! The authenticator only talks to [`CredentialStore`]. Uniqueness of
//! usernames is enforced here: a second insert of an existing username must
//! fail with [`StoreError::Conflict`], never silently overwrite.

mod memory;
mod postgres;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::{auth::types::User, password::PasswordError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    Conflict,
    #[error("password hashing failed")]
    Hash(#[from] PasswordError),
    #[error("database error")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user by username. At most one user matches.
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Hash `password` and persist a new user.
    async fn create_user(&self, username: &str, password: &str) -> Result<User, StoreError>;

    /// Cheap liveness check used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Short backend name for health output and logs.
    fn backend(&self) -> &'static str;
}
