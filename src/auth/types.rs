//! Request/response types and the account record shared by the auth flow.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::AuthError;
use crate::password::MAX_PASSWORD_BYTES;

pub const MSG_USER_CREATED: &str = "New user created";
pub const MSG_WELCOME_BACK: &str = "Thanks for coming back!";

/// One account as held by the credential store.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    /// Reject payloads that decoded but carry empty fields, or a password
    /// the hash oracle cannot tell apart from a longer one.
    ///
    /// # Errors
    /// Returns `AuthError::MalformedRequest` naming the first bad field.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.username.is_empty() {
            return Err(AuthError::MalformedRequest("username is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(AuthError::MalformedRequest("password is required".to_string()));
        }
        if self.password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::MalformedRequest(format!(
                "password must be at most {MAX_PASSWORD_BYTES} bytes"
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Outcome of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub was_created: bool,
}

impl AuthResult {
    /// Informational message for the response body; clients must not branch on it.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        if self.was_created {
            MSG_USER_CREATED
        } else {
            MSG_WELCOME_BACK
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub msg: String,
}
