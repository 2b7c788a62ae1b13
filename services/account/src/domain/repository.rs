#![allow(async_fn_in_trait)]

use uuid::Uuid;

use aegis_domain::attempt::FailedAttempt;
use aegis_domain::user::UserAccount;

use crate::error::AccountServiceError;

/// Port for the user-account store.
///
/// The relational implementation lives with the persistence service; this
/// service ships an in-memory adapter and treats the contract as
/// transactional per request: the account row and its failed-attempt rows
/// are read and written inside one isolation boundary, so sweep-then-insert
/// and read-then-flip sequences do not race each other.
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str)
    -> Result<Option<UserAccount>, AccountServiceError>;

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<UserAccount>, AccountServiceError>;

    async fn insert(&self, account: &UserAccount) -> Result<(), AccountServiceError>;

    /// Persist the given account row wholesale, matched by uuid.
    async fn update(&self, account: &UserAccount) -> Result<(), AccountServiceError>;

    /// All failed-attempt records for a user, expired ones included; the
    /// lockout sweep decides what to reap.
    async fn attempts_for(
        &self,
        user_uuid: Uuid,
    ) -> Result<Vec<FailedAttempt>, AccountServiceError>;

    async fn insert_attempt(&self, attempt: &FailedAttempt) -> Result<(), AccountServiceError>;

    async fn delete_attempt(&self, id: Uuid) -> Result<(), AccountServiceError>;
}

/// Port for the ephemeral key-value cache behind sessions and OTP tickets.
pub trait KvCache: Send + Sync {
    async fn set_ex(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<(), AccountServiceError>;

    /// Write several keys with one TTL as a single atomic operation.
    async fn set_many_ex(
        &self,
        entries: &[(String, String)],
        ttl_secs: u64,
    ) -> Result<(), AccountServiceError>;

    async fn get(&self, key: &str) -> Result<Option<String>, AccountServiceError>;

    /// Delete all keys atomically; returns how many of them existed.
    async fn del_many(&self, keys: &[String]) -> Result<usize, AccountServiceError>;

    /// First key matching a glob pattern (`*` wildcard), if any.
    async fn find_key(&self, pattern: &str) -> Result<Option<String>, AccountServiceError>;
}

/// Port for one-time-passcode delivery. The mail pipeline itself (templates,
/// provider) is a collaborator; a dispatch failure here produces the
/// degraded "registered but unverifiable" responses, not a request error.
pub trait OtpMailer: Send + Sync {
    async fn send_code(&self, email: &str, code: &str) -> Result<(), anyhow::Error>;
}
