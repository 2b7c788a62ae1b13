//! Registration workflow.

use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use aegis_domain::snapshot::PublicUserData;
use aegis_domain::user::{Gender, UserAccount, UserRole, UserStatus};
use aegis_validate::{Fault, FieldValue, MxResolver, Rejection, Validator};

use crate::domain::repository::{AccountRepository, KvCache, OtpMailer};
use crate::error::AccountServiceError;
use crate::hashing;
use crate::otp::OtpService;
use crate::schemas::ValidationTemplates;

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: String,
}

#[derive(Debug)]
pub enum RegisterOutcome {
    Rejected(Rejection),
    EmailInUse,
    /// The account row exists either way; `otp_dispatched == false` is the
    /// degraded "registered but unverifiable" case.
    Registered {
        user: PublicUserData,
        otp_dispatched: bool,
    },
}

pub struct RegisterUseCase<R, C, M, D>
where
    R: AccountRepository,
    C: KvCache,
    M: MxResolver,
    D: OtpMailer,
{
    pub repo: R,
    pub otp: OtpService<C>,
    pub mailer: D,
    pub validator: Validator<M>,
    pub templates: ValidationTemplates,
}

impl<R, C, M, D> RegisterUseCase<R, C, M, D>
where
    R: AccountRepository,
    C: KvCache,
    M: MxResolver,
    D: OtpMailer,
{
    pub async fn execute(
        &self,
        input: RegisterInput,
    ) -> Result<RegisterOutcome, AccountServiceError> {
        let schema = self.templates.auth().bind(HashMap::from([
            ("email", Some(FieldValue::from(input.email.clone()))),
            ("password", Some(FieldValue::from(input.password.clone()))),
            ("first_name", Some(FieldValue::from(input.first_name.clone()))),
            ("last_name", Some(FieldValue::from(input.last_name.clone()))),
            ("gender", Some(FieldValue::from(input.gender.clone()))),
            (
                "date_of_birth",
                Some(FieldValue::from(input.date_of_birth.clone())),
            ),
        ]));

        if let Err(rejection) = self.validator.verify(&schema).await {
            return Ok(RegisterOutcome::Rejected(rejection));
        }

        // Gender is a closed set on top of the schema's shape checks; the
        // tombstone value is not self-assignable.
        let gender = match Gender::from_str_value(&input.gender) {
            Some(gender) if gender != Gender::Deleted => gender,
            _ => {
                return Ok(RegisterOutcome::Rejected(Rejection {
                    faults: vec![Fault::Data(format!(
                        "gender is invalid. Received {}",
                        input.gender
                    ))],
                }));
            }
        };

        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Ok(RegisterOutcome::EmailInUse);
        }

        // Collision-proof the public id before insert.
        let mut uuid = Uuid::new_v4();
        while self.repo.find_by_uuid(uuid).await?.is_some() {
            uuid = Uuid::new_v4();
        }

        let password_hash =
            hashing::hash_password(&input.password).map_err(|e| anyhow::anyhow!("{e}"))?;
        let date_of_birth = NaiveDate::parse_from_str(&input.date_of_birth, "%Y-%m-%d")
            .context("validated date_of_birth failed to parse")?;

        let now = Utc::now().timestamp();
        let account = UserAccount {
            uuid,
            email: input.email.clone(),
            password_hash,
            password_last_changed_at: now,
            failed_login_attempts: 0,
            account_locked_until: 0,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            gender,
            date_of_birth,
            created_at: now,
            updated_at: now,
            last_login: now,
            last_activity_at: now,
            email_verified: false,
            status: UserStatus::Unverified,
            role: UserRole::Customer,
        };

        self.repo.insert(&account).await?;
        tracing::info!(user = %account.uuid, "account registered");

        let otp_dispatched = self.dispatch_otp(&input.email).await;

        Ok(RegisterOutcome::Registered {
            user: account.snapshot(),
            otp_dispatched,
        })
    }

    async fn dispatch_otp(&self, email: &str) -> bool {
        let code = match self.otp.issue(email).await {
            Ok(code) => code,
            Err(err) => {
                tracing::error!(error = %err, "failed to store otp ticket");
                return false;
            }
        };
        match self.mailer.send_code(email, &code).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "otp dispatch failed");
                false
            }
        }
    }
}
