// Auth Service Library

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;
pub mod telemetry;
pub mod validators;

use axum::extract::FromRef;

pub use error::{AuthError, Result, TokenError};
pub use routes::build_router;
pub use services::{AuthService, RefreshTokenStore};

// Re-export commonly used types
pub use models::{Account, AccountId, AccountProfile, AuthenticatedAccount, TokenPair};

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
}

impl AppState {
    pub fn new(auth: AuthService) -> Self {
        Self { auth }
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
