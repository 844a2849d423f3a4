/// Integration tests for crypto-core token functionality
///
/// This test module covers:
/// - Access token issuance and validation through the public API
/// - Token expiration handling
/// - Cross-signer rejection
/// - Refresh token generation and digests
use chrono::{Duration, Utc};
use crypto_core::jwt::{JwtError, JwtSigner, DEFAULT_ISSUER};
use crypto_core::{generate_refresh_token, refresh_token_digest};

// Test secrets - FOR TESTING ONLY
const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";
const ROTATED_SECRET: &str = "integration-test-secret-fedcba9876543210";

fn signer_with(secret: &str) -> JwtSigner {
    JwtSigner::new(secret.as_bytes(), DEFAULT_ISSUER, Duration::minutes(30))
        .expect("test secret should be accepted")
}

#[test]
fn test_token_verifies_for_many_subjects() {
    let signer = signer_with(TEST_SECRET);

    for subject in [1_i64, 2, 99, 1_000_000, i64::MAX] {
        let token = signer.issue(subject).unwrap();
        assert_eq!(signer.verify(&token).unwrap(), subject);
    }
}

#[test]
fn test_cloned_signer_verifies_tokens_from_original() {
    let signer = signer_with(TEST_SECRET);
    let clone = signer.clone();

    let token = signer.issue(5).unwrap();
    assert_eq!(clone.verify(&token).unwrap(), 5);
}

#[test]
fn test_token_just_before_expiry_is_valid() {
    let signer = signer_with(TEST_SECRET);
    let issued_at = Utc::now() - Duration::minutes(29);

    let token = signer.issue_at(5, issued_at).unwrap();
    assert_eq!(signer.verify(&token).unwrap(), 5);
}

#[test]
fn test_token_after_expiry_is_expired() {
    let signer = signer_with(TEST_SECRET);
    let issued_at = Utc::now() - Duration::minutes(31);

    let token = signer.issue_at(5, issued_at).unwrap();
    assert_eq!(signer.verify(&token), Err(JwtError::Expired));
}

#[test]
fn test_signature_checked_before_expiry() {
    let signer = signer_with(TEST_SECRET);
    let foreign = signer_with(ROTATED_SECRET);

    let token = foreign
        .issue_at(5, Utc::now() - Duration::hours(3))
        .unwrap();
    assert_eq!(signer.verify(&token), Err(JwtError::InvalidSignature));
}

#[test]
fn test_issuer_mismatch_rejected() {
    let signer = signer_with(TEST_SECRET);
    let other_issuer =
        JwtSigner::new(TEST_SECRET.as_bytes(), "billing-service", Duration::minutes(30)).unwrap();

    let token = other_issuer.issue(5).unwrap();
    assert_eq!(signer.verify(&token), Err(JwtError::MalformedToken));
}

#[test]
fn test_refresh_token_digest_differs_per_token() {
    let first = generate_refresh_token();
    let second = generate_refresh_token();

    assert_ne!(first, second);
    assert_ne!(refresh_token_digest(&first), refresh_token_digest(&second));
}
