//! Account fixtures.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use aegis_domain::user::{Gender, UserAccount, UserRole, UserStatus};

/// Builder for a test account. Defaults to a verified, inactive customer
/// with no failure history.
pub struct AccountFixture {
    account: UserAccount,
}

impl AccountFixture {
    pub fn new(email: &str, password_hash: &str) -> Self {
        let now = Utc::now().timestamp();
        Self {
            account: UserAccount {
                uuid: Uuid::new_v4(),
                email: email.to_owned(),
                password_hash: password_hash.to_owned(),
                password_last_changed_at: now,
                failed_login_attempts: 0,
                account_locked_until: 0,
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
                gender: Gender::Female,
                date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 2)
                    .unwrap_or_else(|| Utc::now().date_naive()),
                created_at: now,
                updated_at: now,
                last_login: now,
                last_activity_at: now,
                email_verified: true,
                status: UserStatus::Inactive,
                role: UserRole::Customer,
            },
        }
    }

    pub fn unverified(mut self) -> Self {
        self.account.email_verified = false;
        self.account.status = UserStatus::Unverified;
        self
    }

    pub fn build(self) -> UserAccount {
        self.account
    }
}
