//! Logout workflow.

use std::collections::HashMap;

use anyhow::Context as _;
use uuid::Uuid;

use aegis_validate::{FieldValue, MxResolver, Rejection, Validator};

use crate::domain::repository::KvCache;
use crate::error::AccountServiceError;
use crate::schemas::ValidationTemplates;
use crate::session::SessionStore;

pub struct LogoutInput {
    pub session_uuid: String,
    pub user_uuid: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum LogoutOutcome {
    Rejected(Rejection),
    /// Nothing (or only half a session) was there to delete.
    NotLoggedIn,
    LoggedOut,
}

pub struct LogoutUseCase<C, M>
where
    C: KvCache,
    M: MxResolver,
{
    pub sessions: SessionStore<C>,
    pub validator: Validator<M>,
    pub templates: ValidationTemplates,
}

impl<C, M> LogoutUseCase<C, M>
where
    C: KvCache,
    M: MxResolver,
{
    pub async fn execute(&self, input: LogoutInput) -> Result<LogoutOutcome, AccountServiceError> {
        let schema = self.templates.logout().bind(HashMap::from([
            (
                "session_uuid",
                Some(FieldValue::from(input.session_uuid.clone())),
            ),
            ("user_uuid", Some(FieldValue::from(input.user_uuid.clone()))),
        ]));

        if let Err(rejection) = self.validator.verify(&schema).await {
            return Ok(LogoutOutcome::Rejected(rejection));
        }

        let session_uuid = Uuid::parse_str(&input.session_uuid)
            .context("validated session_uuid failed to parse")?;
        let user_uuid =
            Uuid::parse_str(&input.user_uuid).context("validated user_uuid failed to parse")?;

        if self.sessions.delete(session_uuid, user_uuid).await? {
            tracing::info!(user = %user_uuid, "logged out");
            Ok(LogoutOutcome::LoggedOut)
        } else {
            Ok(LogoutOutcome::NotLoggedIn)
        }
    }
}
