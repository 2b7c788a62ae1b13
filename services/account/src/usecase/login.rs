//! Login workflow.

use std::collections::HashMap;

use chrono::Utc;

use aegis_domain::snapshot::PublicUserData;
use aegis_domain::user::UserStatus;
use aegis_validate::{FieldValue, MxResolver, Rejection, Validator};

use crate::domain::repository::{AccountRepository, KvCache, OtpMailer};
use crate::error::AccountServiceError;
use crate::hashing;
use crate::otp::OtpService;
use crate::schemas::ValidationTemplates;
use crate::session::{SessionHandle, SessionStore};
use crate::usecase::lockout::LockoutTracker;

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginSuccess {
    pub user: PublicUserData,
    pub session: SessionHandle,
    /// The account has not verified its email; a fresh OTP was issued and
    /// the session is only good for completing verification.
    pub otp_required: bool,
    /// Whether the OTP (when required) actually went out.
    pub otp_dispatched: bool,
}

#[derive(Debug)]
pub enum LoginOutcome {
    Rejected(Rejection),
    UnknownEmail,
    AccountClosed,
    AccountTerminated,
    TemporarilyLocked,
    WrongPassword,
    LoggedIn(LoginSuccess),
}

pub struct LoginUseCase<R, C, M, D>
where
    R: AccountRepository + Clone,
    C: KvCache,
    M: MxResolver,
    D: OtpMailer,
{
    pub repo: R,
    pub sessions: SessionStore<C>,
    pub otp: OtpService<C>,
    pub mailer: D,
    pub validator: Validator<M>,
    pub templates: ValidationTemplates,
    pub max_login_attempts: u32,
}

impl<R, C, M, D> LoginUseCase<R, C, M, D>
where
    R: AccountRepository + Clone,
    C: KvCache,
    M: MxResolver,
    D: OtpMailer,
{
    fn lockout(&self) -> LockoutTracker<R> {
        LockoutTracker {
            repo: self.repo.clone(),
            max_attempts: self.max_login_attempts,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutcome, AccountServiceError> {
        // Login reuses the auth template; only these two fields are bound.
        let schema = self.templates.auth().bind(HashMap::from([
            ("email", Some(FieldValue::from(input.email.clone()))),
            ("password", Some(FieldValue::from(input.password.clone()))),
        ]));

        if let Err(rejection) = self.validator.verify(&schema).await {
            return Ok(LoginOutcome::Rejected(rejection));
        }

        let Some(mut user) = self.repo.find_by_email(&input.email).await? else {
            return Ok(LoginOutcome::UnknownEmail);
        };

        if !user.is_accessible() {
            match user.status {
                UserStatus::Closed => return Ok(LoginOutcome::AccountClosed),
                UserStatus::Terminated => return Ok(LoginOutcome::AccountTerminated),
                UserStatus::Locked => {
                    // Proceed only when the lock window has lapsed.
                    if !self.lockout().unlock(&mut user).await? {
                        return Ok(LoginOutcome::TemporarilyLocked);
                    }
                }
                UserStatus::Active | UserStatus::Inactive | UserStatus::Unverified => {}
            }
        }

        let password_ok = hashing::verify_password(&input.password, &user.password_hash)
            .map_err(|e| anyhow::anyhow!("stored hash unusable: {e}"))?;

        if !password_ok {
            self.lockout().record_failure(&mut user).await?;
            return Ok(LoginOutcome::WrongPassword);
        }

        user.last_login = Utc::now().timestamp();
        self.repo.update(&user).await?;

        let session = self.sessions.create(&user.snapshot()).await?;

        let otp_required = !user.is_verified();
        let otp_dispatched = if otp_required {
            self.dispatch_otp(&input.email).await
        } else {
            true
        };

        tracing::info!(user = %user.uuid, otp_required, "login succeeded");

        Ok(LoginOutcome::LoggedIn(LoginSuccess {
            user: user.snapshot(),
            session,
            otp_required,
            otp_dispatched,
        }))
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
