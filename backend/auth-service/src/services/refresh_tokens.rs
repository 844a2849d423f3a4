/// Refresh token lifecycle: issue, resolve, rotate, revoke
///
/// Tokens are opaque random strings. The repository only ever sees their
/// SHA256 digest, so the raw value exists solely in the caller's hands.
use chrono::{Duration, Utc};
use crypto_core::{generate_refresh_token, refresh_token_digest};
use std::sync::Arc;

use crate::db::RefreshTokenRepository;
use crate::error::{AuthError, Result};
use crate::models::{AccountId, RotatedToken};

#[derive(Clone)]
pub struct RefreshTokenStore {
    repo: Arc<dyn RefreshTokenRepository>,
    ttl: Duration,
}

impl RefreshTokenStore {
    pub fn new(repo: Arc<dyn RefreshTokenRepository>, ttl: Duration) -> Self {
        Self { repo, ttl }
    }

    /// Mint and persist a new token for `account_id`
    pub async fn issue(&self, account_id: AccountId) -> Result<String> {
        let token = generate_refresh_token();
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Internal("refresh token expiry out of range".to_string()))?;

        self.repo
            .insert(account_id, &refresh_token_digest(&token), expires_at)
            .await?;

        Ok(token)
    }

    /// Owner of `token` if it exists and has not expired
    pub async fn resolve(&self, token: &str) -> Result<Option<AccountId>> {
        self.repo
            .find_active_by_token(&refresh_token_digest(token))
            .await
    }

    /// Consume `old_token` and hand back a replacement for the same account
    ///
    /// The old row is removed with a delete that reports whether this call
    /// removed it. If a concurrent rotation got there first, the replacement
    /// minted here is revoked again and the call fails, so only one rotation
    /// of a given token ever succeeds. A storage failure on that delete is
    /// logged and tolerated: the replacement is already valid and the stale
    /// row dies at its own expiry.
    ///
    /// # Errors
    /// `AuthError::InvalidRefreshToken` if the token is unknown, expired or
    /// already consumed.
    pub async fn rotate(&self, old_token: &str) -> Result<RotatedToken> {
        let old_hash = refresh_token_digest(old_token);

        let account_id = self
            .repo
            .find_active_by_token(&old_hash)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let token = self.issue(account_id).await?;

        match self.repo.delete_by_token(&old_hash).await {
            Ok(true) => Ok(RotatedToken { account_id, token }),
            Ok(false) => {
                tracing::info!(
                    account_id = %account_id,
                    "Refresh token consumed by a concurrent rotation"
                );
                if let Err(e) = self.revoke(&token).await {
                    tracing::warn!(
                        account_id = %account_id,
                        error = %e,
                        "Failed to revoke replacement token after losing rotation race"
                    );
                }
                Err(AuthError::InvalidRefreshToken)
            }
            Err(e) => {
                tracing::warn!(
                    account_id = %account_id,
                    error = %e,
                    "Failed to delete rotated refresh token; it remains until expiry"
                );
                Ok(RotatedToken { account_id, token })
            }
        }
    }

    /// Delete `token`. Revoking an unknown token is not an error.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        self.repo
            .delete_by_token(&refresh_token_digest(token))
            .await?;
        Ok(())
    }

    /// Delete every token held by `account_id`
    pub async fn revoke_all(&self, account_id: AccountId) -> Result<u64> {
        self.repo.delete_by_account(account_id).await
    }

    /// Physically remove expired rows
    pub async fn purge_expired(&self) -> Result<u64> {
        self.repo.delete_expired().await
    }
}
