//! TTL-backed session store.
//!
//! A session is two co-located cache facets under
//! `sid:{session_uuid}:{user_uuid}` — `:user_data` (JSON snapshot of the
//! public user fields) and `:verified` (JSON bool) — each with the same
//! TTL. Both facets are written and deleted through one atomic cache
//! operation so a reader can never observe one facet fresh and the other
//! stale.

use anyhow::Context as _;
use chrono::Utc;
use uuid::Uuid;

use aegis_domain::snapshot::PublicUserData;

use crate::domain::repository::KvCache;
use crate::error::AccountServiceError;

/// Default session lifetime in seconds.
pub const SESSION_TTL_SECS: u64 = 3600;

/// Identifier and absolute expiry handed back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHandle {
    pub session_uuid: Uuid,
    pub expiry_time: i64,
}

/// Outcome of a session read. Absence and decode failure are distinct:
/// clients re-authenticate on `Expired` but a `NoUserData` session is a
/// server-side inconsistency worth logging.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionRead {
    Data(PublicUserData),
    Expired,
    NoUserData,
}

#[derive(Clone)]
pub struct SessionStore<C: KvCache> {
    cache: C,
    ttl_secs: u64,
}

fn base_key(session_uuid: Uuid, user_uuid: Uuid) -> String {
    format!("sid:{session_uuid}:{user_uuid}")
}

impl<C: KvCache> SessionStore<C> {
    pub fn new(cache: C, ttl_secs: u64) -> Self {
        Self { cache, ttl_secs }
    }

    /// Mint a new session for the user and write both facets.
    pub async fn create(
        &self,
        user: &PublicUserData,
    ) -> Result<SessionHandle, AccountServiceError> {
        let session_uuid = Uuid::new_v4();
        self.write(session_uuid, user).await
    }

    /// Full overwrite of an existing session's facets. The snapshot replaces
    /// whatever was stored; there is no partial patching.
    pub async fn update(
        &self,
        session_uuid: Uuid,
        user: &PublicUserData,
    ) -> Result<SessionHandle, AccountServiceError> {
        self.write(session_uuid, user).await
    }

    async fn write(
        &self,
        session_uuid: Uuid,
        user: &PublicUserData,
    ) -> Result<SessionHandle, AccountServiceError> {
        let key = base_key(session_uuid, user.uuid);

        let user_json = serde_json::to_string(user)
            .context("encode session user_data")
            .map_err(AccountServiceError::Internal)?;
        let verified_json = serde_json::to_string(&user.email_verified)
            .context("encode session verified flag")
            .map_err(AccountServiceError::Internal)?;

        self.cache
            .set_many_ex(
                &[
                    (format!("{key}:user_data"), user_json),
                    (format!("{key}:verified"), verified_json),
                ],
                self.ttl_secs,
            )
            .await?;

        Ok(SessionHandle {
            session_uuid,
            expiry_time: Utc::now().timestamp() + self.ttl_secs as i64,
        })
    }

    /// Delete both facets. `Ok(true)` only when both existed; anything less
    /// means there was no live session to log out.
    pub async fn delete(
        &self,
        session_uuid: Uuid,
        user_uuid: Uuid,
    ) -> Result<bool, AccountServiceError> {
        let key = base_key(session_uuid, user_uuid);
        let removed = self
            .cache
            .del_many(&[format!("{key}:user_data"), format!("{key}:verified")])
            .await?;
        Ok(removed == 2)
    }

    /// Fetch and decode the user snapshot for a known (session, user) pair.
    pub async fn read(
        &self,
        session_uuid: Uuid,
        user_uuid: Uuid,
    ) -> Result<SessionRead, AccountServiceError> {
        let key = format!("{}:user_data", base_key(session_uuid, user_uuid));
        self.decode(self.cache.get(&key).await?)
    }

    /// Fetch the snapshot knowing only the session id (the user id is part
    /// of the key, so this scans for the one matching facet).
    pub async fn read_by_session(
        &self,
        session_uuid: Uuid,
    ) -> Result<SessionRead, AccountServiceError> {
        let pattern = format!("sid:{session_uuid}:*:user_data");
        let Some(key) = self.cache.find_key(&pattern).await? else {
            return Ok(SessionRead::Expired);
        };
        self.decode(self.cache.get(&key).await?)
    }

    fn decode(&self, raw: Option<String>) -> Result<SessionRead, AccountServiceError> {
        match raw {
            None => Ok(SessionRead::Expired),
            Some(json) => match serde_json::from_str(&json) {
                Ok(user) => Ok(SessionRead::Data(user)),
                Err(err) => {
                    tracing::warn!(error = %err, "session user_data facet failed to decode");
                    Ok(SessionRead::NoUserData)
                }
            },
        }
    }
}
