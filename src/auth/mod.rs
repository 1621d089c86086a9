//! Login and bootstrap provisioning.
//!
//! Flow: decode `{username, password}`, look the username up, verify the
//! password, or create the account when the bootstrap secret is presented,
//! then sign an HS256 token for the resolved user.

pub mod authenticator;
pub mod error;
mod state;
pub mod token;
pub mod types;

pub use authenticator::Authenticator;
pub use error::{AuthError, ErrorKind, Rejection, SigningError};
pub use state::{AuthConfig, AuthState};
pub use token::{TokenClaims, TokenIssuer};
pub use types::{AuthResult, LoginRequest, LoginResponse, User};
