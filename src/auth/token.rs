//! HS256 bearer tokens.
//!
//! Claims are `iat`, `user_id` and `username`. There is no `exp`: a token stays
//! valid until the signing secret is rotated.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{error::SigningError, types::User};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    pub iat: u64,
    pub user_id: String,
    pub username: String,
}

impl TokenClaims {
    #[must_use]
    pub fn for_user(user: &User, iat: u64) -> Self {
        Self {
            iat,
            user_id: user.id.to_string(),
            username: user.username.clone(),
        }
    }
}

#[derive(Clone)]
pub struct TokenIssuer {
    signing_secret: SecretString,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("signing_secret", &"***")
            .finish()
    }
}

impl TokenIssuer {
    #[must_use]
    pub fn new(signing_secret: SecretString) -> Self {
        Self { signing_secret }
    }

    fn secret_bytes(&self) -> Result<&[u8], SigningError> {
        let secret = self.signing_secret.expose_secret();
        if secret.is_empty() {
            return Err(SigningError::MissingSecret);
        }
        Ok(secret.as_bytes())
    }

    /// Issue a token for `user` stamped with the current time.
    ///
    /// # Errors
    /// Returns `SigningError` if the secret is empty or encoding fails.
    pub fn issue(&self, user: &User) -> Result<String, SigningError> {
        self.issue_at(user, jsonwebtoken::get_current_timestamp())
    }

    /// Issue a token with an explicit `iat` (seconds since the epoch).
    ///
    /// # Errors
    /// Returns `SigningError` if the secret is empty or encoding fails.
    pub fn issue_at(&self, user: &User, iat: u64) -> Result<String, SigningError> {
        let key = EncodingKey::from_secret(self.secret_bytes()?);
        let claims = TokenClaims::for_user(user, iat);
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)?;
        Ok(token)
    }

    /// Check the signature of `token` and return its claims.
    ///
    /// # Errors
    /// Returns `SigningError::Jwt` for malformed tokens or a signature made with
    /// another secret.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, SigningError> {
        let key = DecodingKey::from_secret(self.secret_bytes()?);
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        let data = jsonwebtoken::decode::<TokenClaims>(token, &key, &validation)?;
        Ok(data.claims)
    }
}
