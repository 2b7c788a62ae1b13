//! OTP verification workflow.

use std::collections::HashMap;

use uuid::Uuid;

use aegis_domain::snapshot::PublicUserData;
use aegis_domain::user::UserStatus;
use aegis_validate::{FieldValue, MxResolver, Rejection, Validator};

use crate::domain::repository::{AccountRepository, KvCache, OtpMailer};
use crate::error::AccountServiceError;
use crate::otp::{OtpOutcome, OtpService};
use crate::schemas::ValidationTemplates;
use crate::session::{SessionHandle, SessionRead, SessionStore};

/// `return_action` value that ties the verification to a pending login
/// session.
pub const ACTION_LOGIN: &str = "LOGIN";

pub struct VerifyOtpInput {
    pub email: String,
    pub otp_code: String,
    /// Empty outside the login flow.
    pub session_uuid: String,
    pub return_action: String,
}

#[derive(Debug)]
pub enum VerifyOtpOutcome {
    Rejected(Rejection),
    SessionExpired,
    SessionNoUserData,
    /// The session on file belongs to a different email than the one
    /// submitted for verification.
    SessionEmailMismatch,
    UnknownEmail,
    AlreadyVerified,
    /// The ticket lapsed; a fresh code was issued (unless dispatch failed).
    CodeExpired { reissued: bool },
    CodeInvalid,
    Verified {
        user: PublicUserData,
        /// Refreshed session when the verification completed a login.
        session: Option<SessionHandle>,
    },
}

pub struct VerifyOtpUseCase<R, C, M, D>
where
    R: AccountRepository,
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
}

impl<R, C, M, D> VerifyOtpUseCase<R, C, M, D>
where
    R: AccountRepository,
    C: KvCache,
    M: MxResolver,
    D: OtpMailer,
{
    pub async fn execute(
        &self,
        input: VerifyOtpInput,
    ) -> Result<VerifyOtpOutcome, AccountServiceError> {
        let schema = self.templates.otp().bind(HashMap::from([
            ("email", Some(FieldValue::from(input.email.clone()))),
            ("otp_code", Some(FieldValue::from(input.otp_code.clone()))),
            (
                "session_uuid",
                Some(FieldValue::from(input.session_uuid.clone())),
            ),
            (
                "return_action",
                Some(FieldValue::from(input.return_action.clone())),
            ),
        ]));

        if let Err(rejection) = self.validator.verify(&schema).await {
            return Ok(VerifyOtpOutcome::Rejected(rejection));
        }

        let login_action = input.return_action == ACTION_LOGIN;

        // For a login verification the submitted email must match the one
        // snapshotted into the pending session, so nobody can verify a
        // stranger's session.
        let session_uuid = if login_action {
            let Ok(session_uuid) = Uuid::parse_str(&input.session_uuid) else {
                return Ok(VerifyOtpOutcome::SessionExpired);
            };
            match self.sessions.read_by_session(session_uuid).await? {
                SessionRead::Expired => return Ok(VerifyOtpOutcome::SessionExpired),
                SessionRead::NoUserData => return Ok(VerifyOtpOutcome::SessionNoUserData),
                SessionRead::Data(snapshot) if snapshot.email != input.email => {
                    return Ok(VerifyOtpOutcome::SessionEmailMismatch);
                }
                SessionRead::Data(_) => {}
            }
            Some(session_uuid)
        } else {
            None
        };

        let Some(mut user) = self.repo.find_by_email(&input.email).await? else {
            return Ok(VerifyOtpOutcome::UnknownEmail);
        };

        if user.email_verified {
            return Ok(VerifyOtpOutcome::AlreadyVerified);
        }

        match self.otp.verify(&input.email, &input.otp_code).await? {
            OtpOutcome::Expired => {
                let reissued = self.dispatch_otp(&input.email).await;
                return Ok(VerifyOtpOutcome::CodeExpired { reissued });
            }
            OtpOutcome::Invalid => return Ok(VerifyOtpOutcome::CodeInvalid),
            OtpOutcome::Valid => {}
        }

        user.email_verified = true;
        user.status = UserStatus::Inactive;
        self.repo.update(&user).await?;
        tracing::info!(user = %user.uuid, "email verified");

        let session = match session_uuid {
            Some(session_uuid) => Some(
                self.sessions
                    .update(session_uuid, &user.snapshot())
                    .await?,
            ),
            None => None,
        };

        Ok(VerifyOtpOutcome::Verified {
            user: user.snapshot(),
            session,
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
