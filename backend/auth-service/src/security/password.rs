/// Password hashing and verification using Argon2id
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;

use crate::error::{AuthError, Result};

/// Hash verified when the login email is unknown, so both failure paths do
/// the same Argon2 work
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("dummy-password-for-timing-parity").ok());

/// Hash a password using Argon2id
///
/// Every call draws a fresh salt, so hashing the same password twice yields
/// two different PHC strings that both verify.
///
/// ## Errors
///
/// `AuthError::Hashing` if the underlying KDF fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AuthError::Hashing(e.to_string())
        })?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored PHC hash
///
/// Returns `false` for a mismatch and for a stored hash that does not parse.
/// Comparison is constant-time.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is not a valid PHC string");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Burn one verification's worth of work without a real hash
pub fn verify_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "pw123";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash));
    }

    #[test]
    fn test_wrong_password() {
        let hash = hash_password("pw123").unwrap();
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let first = hash_password("pw123").unwrap();
        let second = hash_password("pw123").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("pw123", &first));
        assert!(verify_password("pw123", &second));
    }

    #[test]
    fn test_hash_is_argon2id_phc() {
        let hash = hash_password("pw123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("pw123"));
    }

    #[test]
    fn test_malformed_hash_is_false() {
        assert!(!verify_password("pw123", ""));
        assert!(!verify_password("pw123", "not-a-phc-string"));
        assert!(!verify_password("pw123", "$argon2id$v=19$broken"));
    }

    #[test]
    fn test_empty_password_round_trip() {
        let hash = hash_password("").unwrap();
        assert!(verify_password("", &hash));
        assert!(!verify_password(" ", &hash));
    }
}
