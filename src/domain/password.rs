//! Password value object - Domain layer password handling.
//!
//! Hashing is argon2id with a fresh random salt per call; the salt and
//! parameters travel inside the PHC string that gets stored.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Password value object that handles hashing and verification.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// This is deliberately slow. Async callers should go through
    /// [`Password::hash_blocking`] instead.
    ///
    /// # Errors
    /// Returns a `password` validation error if the plain text is too short,
    /// or an internal error if the hasher fails.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::field(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
            ));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Hash on tokio's blocking pool so request workers stay free.
    pub async fn hash_blocking(plain_text: String) -> AppResult<Self> {
        tokio::task::spawn_blocking(move || Self::new(&plain_text))
            .await
            .map_err(|e| AppError::internal(format!("Password hash task failed: {}", e)))?
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// Never errors: a mismatch or an unparsable stored hash is just `false`.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Self::argon2()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is not a valid PHC string");
                false
            }
        }
    }

    /// [`Password::verify`] on the blocking pool.
    pub async fn verify_blocking(self, plain_text: String) -> AppResult<bool> {
        tokio::task::spawn_blocking(move || self.verify(&plain_text))
            .await
            .map_err(|e| AppError::internal(format!("Password verify task failed: {}", e)))
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "SecurePassword123!";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("WrongPassword123"));
        assert_ne!(password.as_str(), plain);
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "TestPassword123";
        let hash = Password::new(plain).unwrap().into_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePassword123";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify(plain));
        assert!(pass2.verify(plain));
    }

    #[test]
    fn test_password_too_short() {
        match Password::new("short") {
            Err(AppError::Validation(fields)) => assert!(fields.contains_key("password")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(Password::new("12345678").is_ok());
    }

    #[test]
    fn test_garbage_hash_does_not_verify() {
        let stored = Password::from_hash("not-a-phc-string".to_string());
        assert!(!stored.verify("anything"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = Password::new("SecurePassword123!").unwrap();
        let rendered = format!("{:?}", password);
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("argon2"));
    }

    #[tokio::test]
    async fn test_blocking_helpers() {
        let password = Password::hash_blocking("BlockingPool123".to_string())
            .await
            .unwrap();

        assert!(password.clone().verify_blocking("BlockingPool123".to_string()).await.unwrap());
        assert!(!password.verify_blocking("nope-nope-nope".to_string()).await.unwrap());
    }
}
