//! In-memory account repository.
//!
//! The relational store is a collaborator service; this adapter backs the
//! binary in development and every test. A coarse lock around each record
//! set stands in for the per-request transaction of the real store.

use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::Mutex;
use uuid::Uuid;

use aegis_domain::attempt::FailedAttempt;
use aegis_domain::user::UserAccount;

use crate::domain::repository::AccountRepository;
use crate::error::AccountServiceError;

#[derive(Clone, Default)]
pub struct MemoryAccountRepository {
    accounts: Arc<Mutex<Vec<UserAccount>>>,
    attempts: Arc<Mutex<Vec<FailedAttempt>>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account directly, bypassing the registration flow.
    pub async fn seed(&self, account: UserAccount) {
        self.accounts.lock().await.push(account);
    }

    /// Stored failed-attempt rows for a user (test inspection).
    pub async fn attempt_rows(&self, user_uuid: Uuid) -> usize {
        self.attempts
            .lock()
            .await
            .iter()
            .filter(|a| a.user_uuid == user_uuid)
            .count()
    }

    /// Total account rows (test inspection).
    pub async fn account_rows(&self) -> usize {
        self.accounts.lock().await.len()
    }
}

impl AccountRepository for MemoryAccountRepository {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, AccountServiceError> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<UserAccount>, AccountServiceError> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|a| a.uuid == uuid)
            .cloned())
    }

    async fn insert(&self, account: &UserAccount) -> Result<(), AccountServiceError> {
        let mut accounts = self.accounts.lock().await;
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(anyhow!("duplicate email: {}", account.email).into());
        }
        accounts.push(account.clone());
        Ok(())
    }

    async fn update(&self, account: &UserAccount) -> Result<(), AccountServiceError> {
        let mut accounts = self.accounts.lock().await;
        let row = accounts
            .iter_mut()
            .find(|a| a.uuid == account.uuid)
            .ok_or_else(|| anyhow!("no account row for {}", account.uuid))?;
        *row = account.clone();
        Ok(())
    }

    async fn attempts_for(
        &self,
        user_uuid: Uuid,
    ) -> Result<Vec<FailedAttempt>, AccountServiceError> {
        Ok(self
            .attempts
            .lock()
            .await
            .iter()
            .filter(|a| a.user_uuid == user_uuid)
            .cloned()
            .collect())
    }

    async fn insert_attempt(&self, attempt: &FailedAttempt) -> Result<(), AccountServiceError> {
        self.attempts.lock().await.push(attempt.clone());
        Ok(())
    }

    async fn delete_attempt(&self, id: Uuid) -> Result<(), AccountServiceError> {
        self.attempts.lock().await.retain(|a| a.id != id);
        Ok(())
    }
}
