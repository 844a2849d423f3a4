//! Input validation and normalization for account fields

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AuthError, Result};

// Hardcoded pattern; a failure here is a source bug, not a runtime condition
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_NAME_LENGTH: usize = 255;

/// Canonical form of an email: trimmed and lowercased
///
/// Every lookup and write goes through this, so uniqueness is
/// case-insensitive.
pub fn canonical_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validate email format (RFC 5322 simplified) on the canonical form
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= MAX_EMAIL_LENGTH && EMAIL_REGEX.is_match(email)
}

/// Canonicalize and validate an email supplied for a write
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = canonical_email(raw);
    if validate_email(&email) {
        Ok(email)
    } else {
        Err(AuthError::Validation("Invalid email format".to_string()))
    }
}

/// Trim a display name and reject empty or oversized ones
pub fn normalize_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AuthError::Validation("Name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AuthError::Validation(format!(
            "Name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }

    Ok(name.to_string())
}

/// Passwords only need to be present; there is no strength policy
pub fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        Err(AuthError::Validation("Password must not be empty".to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_canonicalized() {
        assert_eq!(normalize_email("  Ana@X.io ").unwrap(), "ana@x.io");
    }

    #[test]
    fn test_invalid_emails() {
        for bad in ["", "ana", "ana@", "@x.io", "ana@x", "ana @x.io", "ana@x.i"] {
            assert!(normalize_email(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_overlong_email() {
        let local = "a".repeat(250);
        assert!(normalize_email(&format!("{local}@x.io")).is_err());
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(normalize_name("  Ana B ").unwrap(), "Ana B");
        assert!(normalize_name("   ").is_err());
        assert!(normalize_name(&"n".repeat(256)).is_err());
    }

    #[test]
    fn test_password_presence() {
        assert!(validate_password("pw123").is_ok());
        assert!(matches!(
            validate_password(""),
            Err(AuthError::Validation(_))
        ));
    }
}
