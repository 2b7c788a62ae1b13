use aegis_validate::{DnsMxResolver, Validator};

use crate::infra::cache::CacheBackend;
use crate::infra::mailer::LogMailer;
use crate::infra::memory::MemoryAccountRepository;
use crate::otp::OtpService;
use crate::schemas::ValidationTemplates;
use crate::session::SessionStore;

/// Shared application state handed to the gRPC service.
#[derive(Clone)]
pub struct AppState {
    pub repo: MemoryAccountRepository,
    pub cache: CacheBackend,
    pub validator: Validator<DnsMxResolver>,
    pub templates: ValidationTemplates,
    pub otp_secret: String,
    pub otp_ttl_secs: u64,
    pub session_ttl_secs: u64,
    pub max_login_attempts: u32,
}

impl AppState {
    pub fn sessions(&self) -> SessionStore<CacheBackend> {
        SessionStore::new(self.cache.clone(), self.session_ttl_secs)
    }

    pub fn otp(&self) -> OtpService<CacheBackend> {
        OtpService::new(self.cache.clone(), self.otp_secret.clone(), self.otp_ttl_secs)
    }

    pub fn mailer(&self) -> LogMailer {
        LogMailer
    }
}
