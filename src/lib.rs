//! # Tollgate
//!
//! `tollgate` turns a username/password pair into a signed bearer token.
//!
//! ## Login
//!
//! `POST /login` with `{"username", "password"}`:
//!
//! - **Known user:** the password is checked against the stored bcrypt hash.
//! - **Unknown user:** the account is created on the spot, but only when the
//!   request carries `Authorization: Bearer <bootstrap secret>` matching the
//!   configured bootstrap secret. Without a configured secret nobody can be
//!   provisioned.
//!
//! Every rejection returns the same `401 Unauthorized` body so callers cannot
//! tell which usernames exist.
//!
//! ## Tokens
//!
//! Tokens are HS256 JWTs carrying `iat`, `user_id` and `username`. They have
//! no expiry; rotating the signing secret invalidates all of them.

pub mod auth;
pub mod cli;
pub mod password;
pub mod store;
pub mod tollgate;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
