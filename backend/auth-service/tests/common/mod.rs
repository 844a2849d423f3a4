//! Test fixtures and helpers shared by the auth-service integration tests

#![allow(dead_code)]

use std::sync::Arc;

use auth_service::db::{InMemoryAccountRepository, InMemoryRefreshTokenRepository};
use auth_service::security::JwtSigner;
use auth_service::{AppState, AuthService, RefreshTokenStore};
use chrono::Duration;

/// Standard test account
pub const TEST_NAME: &str = "Ana";
pub const TEST_EMAIL: &str = "ana@x.io";
pub const TEST_PASSWORD: &str = "pw123";

/// Second account for conflict checks
pub const OTHER_NAME: &str = "Bo";
pub const OTHER_EMAIL: &str = "other-existing@x.io";

// FOR TESTING ONLY
pub const TEST_SECRET: &[u8] = b"integration-secret-0123456789abcdef";

pub struct TestContext {
    pub service: AuthService,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub tokens: Arc<InMemoryRefreshTokenRepository>,
    pub signer: JwtSigner,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_ttls(Duration::minutes(30), Duration::days(7))
    }

    pub fn with_ttls(access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let tokens = Arc::new(InMemoryRefreshTokenRepository::new());
        let signer = test_signer(access_ttl);

        let service = AuthService::new(
            accounts.clone(),
            RefreshTokenStore::new(tokens.clone(), refresh_ttl),
            signer.clone(),
        );

        Self {
            service,
            accounts,
            tokens,
            signer,
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.service.clone())
    }
}

pub fn test_signer(ttl: Duration) -> JwtSigner {
    JwtSigner::new(TEST_SECRET, "auth-service", ttl).expect("test secret is long enough")
}
