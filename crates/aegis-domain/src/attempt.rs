//! Failed login attempt records backing the progressive lockout.

use uuid::Uuid;

/// One recorded failed login. Ephemeral: reaped lazily whenever a lookup
/// observes `expires_at < now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub id: Uuid,
    pub user_uuid: Uuid,
    /// Unix seconds at which the failure happened.
    pub failed_at: i64,
    /// Unix seconds past which the attempt no longer counts toward the
    /// lockout threshold (`failed_at + 8 x lock_window`).
    pub expires_at: i64,
}

impl FailedAttempt {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at < now
    }
}
