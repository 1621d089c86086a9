//! One-way password hashing with bcrypt.
//!
//! Hashing and verification are CPU bound, so both run on the blocking pool.
//! Passwords longer than [`MAX_PASSWORD_BYTES`] are refused instead of being
//! silently truncated by bcrypt.

use thiserror::Error;

pub use bcrypt::DEFAULT_COST;

/// Cost bounds accepted by bcrypt.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// bcrypt reads 72 bytes of input including a trailing NUL, so this is the
/// longest password the non-truncating calls accept.
pub const MAX_PASSWORD_BYTES: usize = 71;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt failure")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("password hashing task failed")]
    Join(#[from] tokio::task::JoinError),
}

/// Hash a plaintext password with the given bcrypt cost.
///
/// # Errors
/// Returns an error if the cost is out of range, the password is longer than
/// [`MAX_PASSWORD_BYTES`], or the blocking task fails.
pub async fn hash(password: String, cost: u32) -> Result<String, PasswordError> {
    let hashed =
        tokio::task::spawn_blocking(move || bcrypt::non_truncating_hash(password, cost)).await??;
    Ok(hashed)
}

/// Check a plaintext password against a stored bcrypt hash.
///
/// # Errors
/// Returns an error if the stored hash is not a valid bcrypt string or the
/// password is longer than [`MAX_PASSWORD_BYTES`].
pub async fn verify(password: String, password_hash: String) -> Result<bool, PasswordError> {
    let matched = tokio::task::spawn_blocking(move || {
        bcrypt::non_truncating_verify(password, &password_hash)
    })
    .await??;
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() -> Result<(), PasswordError> {
        let hashed = hash("hunter2".to_string(), MIN_COST).await?;
        assert_ne!(hashed, "hunter2");
        assert!(verify("hunter2".to_string(), hashed.clone()).await?);
        assert!(!verify("hunter3".to_string(), hashed).await?);
        Ok(())
    }

    #[tokio::test]
    async fn same_password_hashes_differ() -> Result<(), PasswordError> {
        let first = hash("hunter2".to_string(), MIN_COST).await?;
        let second = hash("hunter2".to_string(), MIN_COST).await?;
        assert_ne!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn long_passwords_are_not_truncated() -> Result<(), PasswordError> {
        let longest = "a".repeat(MAX_PASSWORD_BYTES);
        let hashed = hash(longest.clone(), MIN_COST).await?;
        assert!(verify(longest.clone(), hashed.clone()).await?);

        // Same prefix, different tail.
        assert!(verify(format!("{longest}WRONG"), hashed).await.is_err());
        assert!(hash(format!("{longest}b"), MIN_COST).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_hash_is_an_error() {
        let result = verify("hunter2".to_string(), "not-a-hash".to_string()).await;
        assert!(result.is_err());
    }
}
