//! Login decision procedure: verify an existing account, or provision a new
//! one when the caller presents the bootstrap secret.

use secrecy::{ExposeSecret, SecretString};
use std::{fmt, sync::Arc};
use tracing::{debug, info, instrument, warn};

use super::{
    error::{AuthError, Rejection},
    types::{AuthResult, LoginRequest},
};
use crate::{
    password,
    store::{CredentialStore, StoreError},
};

pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    bootstrap_secret: Option<SecretString>,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("store", &self.store.backend())
            .field("provisioning", &self.provisioning_enabled())
            .finish()
    }
}

impl Authenticator {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, bootstrap_secret: Option<SecretString>) -> Self {
        Self {
            store,
            bootstrap_secret,
        }
    }

    #[must_use]
    pub fn provisioning_enabled(&self) -> bool {
        self.bootstrap_secret
            .as_ref()
            .is_some_and(|secret| !secret.expose_secret().is_empty())
    }

    /// Resolve `request` to a user.
    ///
    /// Known usernames must present the right password. Unknown usernames are
    /// created only when `presented_bootstrap` equals the configured bootstrap
    /// secret.
    ///
    /// # Errors
    /// `MalformedRequest` for empty fields, `Unauthorized` for any rejection,
    /// `Storage` when the store or the hash oracle fails.
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn authenticate(
        &self,
        request: &LoginRequest,
        presented_bootstrap: Option<&str>,
    ) -> Result<AuthResult, AuthError> {
        request.validate()?;

        if let Some(user) = self.store.find_user(&request.username).await? {
            let matched = password::verify(request.password.clone(), user.password_hash.clone())
                .await
                .map_err(|err| AuthError::Storage(StoreError::Hash(err)))?;

            if !matched {
                debug!("password mismatch for existing user");
                return Err(AuthError::Unauthorized(Rejection::InvalidCredentials));
            }

            return Ok(AuthResult {
                user,
                was_created: false,
            });
        }

        if !self.bootstrap_matches(presented_bootstrap) {
            debug!("unknown user and no valid bootstrap secret");
            return Err(AuthError::Unauthorized(Rejection::BootstrapMismatch));
        }

        let user = match self
            .store
            .create_user(&request.username, &request.password)
            .await
        {
            Ok(user) => user,
            Err(StoreError::Conflict) => {
                warn!("username was provisioned concurrently");
                return Err(AuthError::Unauthorized(Rejection::UsernameConflict));
            }
            Err(err) => return Err(err.into()),
        };

        info!(user_id = %user.id, "provisioned new user");

        Ok(AuthResult {
            user,
            was_created: true,
        })
    }

    fn bootstrap_matches(&self, presented: Option<&str>) -> bool {
        let Some(expected) = self.bootstrap_secret.as_ref() else {
            return false;
        };
        let expected = expected.expose_secret();
        match presented {
            Some(presented) if !expected.is_empty() => {
                constant_time_eq(presented.as_bytes(), expected.as_bytes())
            }
            _ => false,
        }
    }
}

/// Constant-time byte comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
