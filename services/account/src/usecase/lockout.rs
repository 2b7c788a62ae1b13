//! Progressive lockout over the failed-attempt history.
//!
//! Each failure inserts a record that expires after eight lock windows; the
//! window itself grows super-exponentially with the number of currently
//! valid failures, so sparse failures decay away while bursts lock the
//! account quickly and for longer each time.

use chrono::Utc;
use uuid::Uuid;

use aegis_domain::attempt::FailedAttempt;
use aegis_domain::user::{UserAccount, UserStatus};

use crate::domain::repository::AccountRepository;
use crate::error::AccountServiceError;

/// Lock window in seconds for a given count of currently valid failures:
/// `floor(2^(count^1.1))` minutes.
pub fn lock_window_secs(valid_count: u32) -> i64 {
    let minutes = f64::powf(2.0, f64::powf(valid_count as f64, 1.1)).floor() as i64;
    minutes * 60
}

/// How long a failure record keeps counting toward the threshold.
fn attempt_decay_secs(valid_count: u32) -> i64 {
    lock_window_secs(valid_count) * 8
}

#[derive(Clone)]
pub struct LockoutTracker<R: AccountRepository> {
    pub repo: R,
    /// Number of valid failures at which the account locks (externally
    /// configured).
    pub max_attempts: u32,
}

impl<R: AccountRepository> LockoutTracker<R> {
    /// Reap expired failure records, decrementing the user's counter for
    /// each, and return how many failures still count.
    pub async fn sweep(&self, user: &mut UserAccount) -> Result<u32, AccountServiceError> {
        let attempts = self.repo.attempts_for(user.uuid).await?;
        let now = Utc::now().timestamp();

        let mut valid = attempts.len() as i64;
        let mut reaped = false;

        for attempt in &attempts {
            if attempt.is_expired(now) {
                self.repo.delete_attempt(attempt.id).await?;
                valid -= 1;
                user.failed_login_attempts = (user.failed_login_attempts - 1).max(0);
                reaped = true;
            }
        }

        if reaped {
            self.repo.update(user).await?;
        }

        Ok(valid.max(0) as u32)
    }

    /// Record one failed login. Sweeps first, inserts the new record with
    /// its decay horizon, and locks the account once the valid count
    /// (including this failure) reaches the threshold.
    pub async fn record_failure(&self, user: &mut UserAccount) -> Result<(), AccountServiceError> {
        let valid_before = self.sweep(user).await?;
        let now = Utc::now().timestamp();

        let window = lock_window_secs(valid_before);
        let attempt = FailedAttempt {
            id: Uuid::new_v4(),
            user_uuid: user.uuid,
            failed_at: now,
            expires_at: now + attempt_decay_secs(valid_before),
        };

        user.failed_login_attempts += 1;

        if valid_before + 1 >= self.max_attempts {
            user.account_locked_until = now + window;
            user.status = UserStatus::Locked;
            tracing::warn!(
                user = %user.uuid,
                valid_failures = valid_before + 1,
                locked_for_secs = window,
                "account locked after repeated failures"
            );
        }

        self.repo.insert_attempt(&attempt).await?;
        self.repo.update(user).await?;
        Ok(())
    }

    /// Attempt to lift a lock. Sweeps first (which may erase the history
    /// without touching the status), then flips Locked back to Inactive
    /// only once the lock deadline has passed. Returns whether the account
    /// is usable again.
    pub async fn unlock(&self, user: &mut UserAccount) -> Result<bool, AccountServiceError> {
        self.sweep(user).await?;

        let now = Utc::now().timestamp();

        if user.account_locked_until < now {
            if user.status == UserStatus::Locked {
                user.status = UserStatus::Inactive;
                self.repo.update(user).await?;
                tracing::info!(user = %user.uuid, "account lock expired, unlocked");
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
