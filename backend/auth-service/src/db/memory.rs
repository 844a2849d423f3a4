//! In-process repositories
//!
//! Same contracts as the Postgres repositories, held in memory. Used by the
//! test suites and for running the service without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{AccountRepository, RefreshTokenRepository};
use crate::error::{AuthError, Result};
use crate::models::{Account, AccountId, NewAccount, RefreshTokenRecord};

#[derive(Default)]
struct AccountTable {
    last_id: i64,
    rows: HashMap<AccountId, Account>,
}

impl AccountTable {
    fn email_owner(&self, email: &str) -> Option<AccountId> {
        self.rows
            .values()
            .find(|account| account.email == email)
            .map(|account| account.id)
    }
}

#[derive(Default)]
pub struct InMemoryAccountRepository {
    table: RwLock<AccountTable>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let table = self.table.read().await;
        Ok(table
            .email_owner(email)
            .and_then(|id| table.rows.get(&id).cloned()))
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account> {
        let mut table = self.table.write().await;
        if table.email_owner(&account.email).is_some() {
            return Err(AuthError::AlreadyExists);
        }

        // Ids only grow, so a deleted account's id is never handed out again
        table.last_id += 1;
        let created = Account {
            id: AccountId(table.last_id),
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            created_at: account.created_at,
            updated_at: account.created_at,
        };
        table.rows.insert(created.id, created.clone());

        Ok(created)
    }

    async fn update(&self, id: AccountId, name: &str, email: &str) -> Result<Option<Account>> {
        let mut table = self.table.write().await;
        if matches!(table.email_owner(email), Some(owner) if owner != id) {
            return Err(AuthError::EmailInUse);
        }

        Ok(table.rows.get_mut(&id).map(|account| {
            account.name = name.to_string();
            account.email = email.to_string();
            account.updated_at = Utc::now();
            account.clone()
        }))
    }

    async fn delete(&self, id: AccountId) -> Result<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
    rows: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently stored, expired ones included
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn insert(
        &self,
        account_id: AccountId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(token_hash) {
            return Err(AuthError::Storage("duplicate refresh token".to_string()));
        }

        rows.insert(
            token_hash.to_string(),
            RefreshTokenRecord {
                token_hash: token_hash.to_string(),
                account_id,
                expires_at,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn find_active_by_token(&self, token_hash: &str) -> Result<Option<AccountId>> {
        let now = Utc::now();
        Ok(self
            .rows
            .read()
            .await
            .get(token_hash)
            .filter(|record| record.is_active_at(now))
            .map(|record| record.account_id))
    }

    async fn delete_by_token(&self, token_hash: &str) -> Result<bool> {
        Ok(self.rows.write().await.remove(token_hash).is_some())
    }

    async fn delete_by_account(&self, account_id: AccountId) -> Result<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, record| record.account_id != account_id);
        Ok((before - rows.len()) as u64)
    }

    async fn delete_expired(&self) -> Result<u64> {
        let now = Utc::now();
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, record| record.is_active_at(now));
        Ok((before - rows.len()) as u64)
    }
}
