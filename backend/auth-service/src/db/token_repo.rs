/// Refresh token database operations
///
/// Rows are keyed by the SHA256 digest of the token, never the raw value.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::AccountId;

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn insert(
        &self,
        account_id: AccountId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Owner of an unexpired token; expired rows are treated as absent
    async fn find_active_by_token(&self, token_hash: &str) -> Result<Option<AccountId>>;

    /// Delete a token row; returns whether this call removed it
    ///
    /// When several callers race on the same row, at most one sees `true`.
    async fn delete_by_token(&self, token_hash: &str) -> Result<bool>;

    /// Delete every token belonging to an account; returns rows removed
    async fn delete_by_account(&self, account_id: AccountId) -> Result<u64>;

    /// Delete rows whose expiry has passed; returns rows removed
    async fn delete_expired(&self) -> Result<u64>;
}

/// PostgreSQL-backed refresh token repository
#[derive(Clone)]
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn insert(
        &self,
        account_id: AccountId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token_hash, account_id, expires_at, created_at)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(token_hash)
        .bind(account_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_active_by_token(&self, token_hash: &str) -> Result<Option<AccountId>> {
        let account_id = sqlx::query_scalar::<_, i64>(
            "SELECT account_id FROM refresh_tokens WHERE token_hash = $1 AND expires_at > NOW()",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account_id.map(AccountId))
    }

    async fn delete_by_token(&self, token_hash: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_account(&self, account_id: AccountId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
