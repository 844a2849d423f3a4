/// Account database operations
use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{AuthError, Result};
use crate::models::{Account, AccountId, NewAccount};

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

/// Storage for accounts. Email uniqueness is enforced here, not by callers.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by (already normalized) email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>>;

    /// Persist a new account and return it with its assigned id
    ///
    /// # Errors
    /// `AuthError::AlreadyExists` if the email is taken.
    async fn insert(&self, account: NewAccount) -> Result<Account>;

    /// Replace name and email, bumping `updated_at`
    ///
    /// Returns `Ok(None)` if no account has this id.
    ///
    /// # Errors
    /// `AuthError::EmailInUse` if another account owns the email.
    async fn update(&self, id: AccountId, name: &str, email: &str) -> Result<Option<Account>>;

    /// Delete an account; returns whether a row was removed
    async fn delete(&self, id: AccountId) -> Result<bool>;
}

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account> {
        sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO accounts (name, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation_as(e, AuthError::AlreadyExists))
    }

    async fn update(&self, id: AccountId, name: &str, email: &str) -> Result<Option<Account>> {
        sqlx::query_as::<_, Account>(&format!(
            r#"
            UPDATE accounts
            SET name = $2, email = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation_as(e, AuthError::EmailInUse))
    }

    async fn delete(&self, id: AccountId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Translate a unique-constraint violation into a domain conflict
fn unique_violation_as(err: sqlx::Error, conflict: AuthError) -> AuthError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => conflict,
        _ => AuthError::from(err),
    }
}
