//! Failure kinds for the login flow and their HTTP mapping.
//!
//! Every authentication rejection collapses to the same `401 Unauthorized`
//! response. The cause is kept on the error for logs only, so a caller cannot
//! tell an unknown username from a wrong password or a bad bootstrap secret.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;

pub const UNAUTHORIZED_BODY: &str = "Unauthorized";
pub const INTERNAL_ERROR_BODY: &str = "Internal server error";

/// Closed set of failure kinds the login flow can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedRequest,
    InvalidCredentials,
    AuthenticationFailed,
    StorageFault,
    SigningError,
}

/// Internal cause of an authentication rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// User exists but the password did not verify.
    InvalidCredentials,
    /// User does not exist and the bootstrap secret was missing or wrong.
    BootstrapMismatch,
    /// Provisioning raced with another insert of the same username.
    UsernameConflict,
}

impl Rejection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::BootstrapMismatch => "bootstrap_mismatch",
            Self::UsernameConflict => "username_conflict",
        }
    }
}

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("signing secret is not configured")]
    MissingSecret,
    #[error("jwt error")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("unauthorized")]
    Unauthorized(Rejection),
    #[error("credential store failure")]
    Storage(#[source] StoreError),
    #[error("token signing failed")]
    Signing(#[from] SigningError),
}

impl AuthError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedRequest(_) => ErrorKind::MalformedRequest,
            Self::Unauthorized(Rejection::InvalidCredentials) => ErrorKind::InvalidCredentials,
            Self::Unauthorized(Rejection::BootstrapMismatch | Rejection::UsernameConflict) => {
                ErrorKind::AuthenticationFailed
            }
            Self::Storage(_) => ErrorKind::StorageFault,
            Self::Signing(_) => ErrorKind::SigningError,
        }
    }

    /// Coarse status exposed to clients.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::MalformedRequest => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidCredentials | ErrorKind::AuthenticationFailed => {
                StatusCode::UNAUTHORIZED
            }
            ErrorKind::StorageFault | ErrorKind::SigningError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => Self::Unauthorized(Rejection::UsernameConflict),
            other => Self::Storage(other),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::MalformedRequest(message) => {
                warn!("Rejecting malformed login request: {message}");
                message.clone()
            }
            Self::Unauthorized(rejection) => {
                warn!(reason = rejection.as_str(), "Authentication rejected");
                UNAUTHORIZED_BODY.to_string()
            }
            Self::Storage(err) => {
                error!("Credential store failure: {err:?}");
                INTERNAL_ERROR_BODY.to_string()
            }
            Self::Signing(err) => {
                error!("Token signing failure: {err:?}");
                INTERNAL_ERROR_BODY.to_string()
            }
        };

        (status, body).into_response()
    }
}
