//! Auth configuration and the shared per-process state handed to handlers.

use secrecy::SecretString;
use std::{fmt, sync::Arc};

use super::{authenticator::Authenticator, token::TokenIssuer};
use crate::store::CredentialStore;

#[derive(Clone)]
pub struct AuthConfig {
    signing_secret: SecretString,
    bootstrap_secret: Option<SecretString>,
}

impl AuthConfig {
    #[must_use]
    pub fn new(signing_secret: SecretString) -> Self {
        Self {
            signing_secret,
            bootstrap_secret: None,
        }
    }

    /// Enable auto-provisioning of unknown usernames for callers presenting
    /// this secret. Empty secrets leave provisioning disabled.
    #[must_use]
    pub fn with_bootstrap_secret(mut self, secret: Option<SecretString>) -> Self {
        self.bootstrap_secret = secret;
        self
    }

    pub(crate) fn signing_secret(&self) -> &SecretString {
        &self.signing_secret
    }

    pub(crate) fn bootstrap_secret(&self) -> Option<&SecretString> {
        self.bootstrap_secret.as_ref()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_secret", &"***")
            .field(
                "bootstrap_secret",
                &self.bootstrap_secret.as_ref().map(|_| "***"),
            )
            .finish()
    }
}

/// Everything the login handler needs, shared behind an `Arc`.
pub struct AuthState {
    authenticator: Authenticator,
    issuer: TokenIssuer,
    store: Arc<dyn CredentialStore>,
}

impl AuthState {
    #[must_use]
    pub fn new(config: &AuthConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            authenticator: Authenticator::new(store.clone(), config.bootstrap_secret().cloned()),
            issuer: TokenIssuer::new(config.signing_secret().clone()),
            store,
        }
    }

    #[must_use]
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    #[must_use]
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    #[must_use]
    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }
}

impl fmt::Debug for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthState")
            .field("authenticator", &self.authenticator)
            .field("issuer", &self.issuer)
            .field("store", &self.store.backend())
            .finish()
    }
}
