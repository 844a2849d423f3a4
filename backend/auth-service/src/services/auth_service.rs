use chrono::Utc;
use crypto_core::JwtSigner;
use std::sync::Arc;

use crate::db::AccountRepository;
use crate::error::{AuthError, Result};
use crate::models::{AccountId, AccountProfile, AuthenticatedAccount, NewAccount, TokenPair};
use crate::security::password;
use crate::services::RefreshTokenStore;
use crate::validators;

/// Account and session use cases exposed to the HTTP layer
///
/// Every dependency is handed in at construction; the service holds no
/// global state and is cheap to clone.
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    refresh_tokens: RefreshTokenStore,
    signer: Arc<JwtSigner>,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        refresh_tokens: RefreshTokenStore,
        signer: JwtSigner,
    ) -> Self {
        Self {
            accounts,
            refresh_tokens,
            signer: Arc::new(signer),
        }
    }

    pub fn refresh_tokens(&self) -> &RefreshTokenStore {
        &self.refresh_tokens
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<AccountProfile> {
        let name = validators::normalize_name(name)?;
        let email = validators::normalize_email(email)?;
        validators::validate_password(password)?;

        if self.accounts.find_by_email(&email).await?.is_some() {
            tracing::info!("Registration rejected: email already registered");
            return Err(AuthError::AlreadyExists);
        }

        let password_hash = hash_off_thread(password).await?;

        let account = self
            .accounts
            .insert(NewAccount {
                name,
                email,
                password_hash,
                created_at: Utc::now(),
            })
            .await
            .map_err(|e| {
                if matches!(e, AuthError::AlreadyExists) {
                    tracing::info!("Registration rejected: email registered concurrently");
                }
                e
            })?;

        tracing::info!(account_id = %account.id, "Account registered");
        Ok(account.into())
    }

    /// Unknown email and wrong password fail identically
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair> {
        let email = validators::canonical_email(email);

        let Some(account) = self.accounts.find_by_email(&email).await? else {
            burn_verification(password).await;
            tracing::info!("Login failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_off_thread(password, &account.password_hash).await? {
            tracing::info!(account_id = %account.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        // Earlier sessions stay valid; each login adds a refresh token
        let access_token = self.signer.issue(account.id.get())?;
        let refresh_token = self.refresh_tokens.issue(account.id).await?;

        tracing::info!(account_id = %account.id, "Account logged in");
        Ok(self.token_pair(account.id, access_token, refresh_token))
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let rotated = self
            .refresh_tokens
            .rotate(refresh_token)
            .await
            .map_err(|e| {
                if matches!(e, AuthError::InvalidRefreshToken) {
                    tracing::info!("Refresh rejected: token unknown, expired or consumed");
                }
                e
            })?;

        let access_token = self.signer.issue(rotated.account_id.get())?;

        tracing::info!(account_id = %rotated.account_id, "Tokens refreshed");
        Ok(self.token_pair(rotated.account_id, access_token, rotated.token))
    }

    pub async fn logout(&self, refresh_token: &str) -> Result<()> {
        self.refresh_tokens.revoke(refresh_token).await
    }

    /// Turn a bearer access token into an explicit caller identity
    pub fn authenticate(&self, access_token: &str) -> Result<AuthenticatedAccount> {
        let subject = self.signer.verify(access_token)?;
        Ok(AuthenticatedAccount::new(AccountId(subject)))
    }

    pub async fn get_profile(&self, caller: &AuthenticatedAccount) -> Result<AccountProfile> {
        self.accounts
            .find_by_id(caller.account_id())
            .await?
            .map(AccountProfile::from)
            .ok_or(AuthError::NotAuthenticated)
    }

    pub async fn update_profile(
        &self,
        caller: &AuthenticatedAccount,
        name: &str,
        email: &str,
    ) -> Result<AccountProfile> {
        let account_id = caller.account_id();
        let name = validators::normalize_name(name)?;
        let email = validators::normalize_email(email)?;

        if let Some(owner) = self.accounts.find_by_email(&email).await? {
            if owner.id != account_id {
                tracing::info!(account_id = %account_id, "Profile update rejected: email in use");
                return Err(AuthError::EmailInUse);
            }
        }

        let account = self
            .accounts
            .update(account_id, &name, &email)
            .await?
            .ok_or(AuthError::NotAuthenticated)?;

        tracing::info!(account_id = %account_id, "Profile updated");
        Ok(account.into())
    }

    /// Delete the caller's account along with every refresh token it holds
    pub async fn delete_account(&self, caller: &AuthenticatedAccount) -> Result<()> {
        let account_id = caller.account_id();

        let revoked = self.refresh_tokens.revoke_all(account_id).await?;
        if !self.accounts.delete(account_id).await? {
            return Err(AuthError::NotAuthenticated);
        }

        tracing::info!(account_id = %account_id, revoked_tokens = revoked, "Account deleted");
        Ok(())
    }

    fn token_pair(&self, account_id: AccountId, access: String, refresh: String) -> TokenPair {
        TokenPair::bearer(account_id, access, refresh, self.signer.ttl().num_seconds())
    }
}

// Argon2 is deliberately slow; keep it off the async workers

async fn hash_off_thread(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
}

async fn verify_off_thread(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

async fn burn_verification(password: &str) {
    let password = password.to_string();
    if let Err(e) = tokio::task::spawn_blocking(move || password::verify_dummy(&password)).await {
        tracing::warn!(error = %e, "Dummy password verification task failed");
    }
}
