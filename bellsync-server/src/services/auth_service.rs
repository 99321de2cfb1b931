use std::sync::Arc;

use argon2::password_hash::{SaltString, rand_core};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash};

/// Minimum length accepted for a new device password.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct Argon2Hash(Argon2<'static>);

#[derive(Clone)]
pub struct AuthService {
    hasher: Arc<Argon2Hash>,
}

impl AuthService {
    pub fn new() -> Self {
        let hash = Argon2Hash(Argon2::default());

        Self {
            hasher: Arc::new(hash),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, password_hash::Error> {
        let hash_salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self.hasher.0.hash_password(password.as_bytes(), &hash_salt)?;

        Ok(hash.to_string())
    }

    /// Verifies a candidate password against a stored PHC string. The
    /// comparison happens inside argon2, never on the raw candidate.
    pub fn verify(&self, stored_hash: &str, candidate: &str) -> Result<bool, password_hash::Error> {
        let parsed_hash = PasswordHash::new(stored_hash)?;

        Ok(self
            .hasher
            .0
            .verify_password(candidate.as_bytes(), &parsed_hash)
            .is_ok())
    }

    pub fn meets_policy(&self, password: &str) -> bool {
        password.chars().count() >= MIN_PASSWORD_LEN
    }
}

impl Default for AuthService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let auth_service = AuthService::new();
        let password = "ring-twice";

        let hash = auth_service.hash(password).unwrap();
        assert!(hash.starts_with("$argon2"));

        assert!(auth_service.verify(&hash, password).unwrap());
        assert!(!auth_service.verify(&hash, "wrong-password").unwrap());
    }

    #[test]
    fn test_password_policy() {
        let auth_service = AuthService::new();

        assert!(!auth_service.meets_policy("seven77"));
        assert!(auth_service.meets_policy("eight888"));
    }
}
