use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use aegis_testing::fixture::AccountFixture;
use aegis_testing::mx::StaticMxResolver;
use aegis_validate::Validator;

use aegis_account::domain::repository::OtpMailer;
use aegis_account::hashing;
use aegis_account::infra::cache::MemoryKvCache;
use aegis_account::infra::memory::MemoryAccountRepository;
use aegis_account::otp::OtpService;
use aegis_account::schemas::ValidationTemplates;
use aegis_account::session::SessionStore;
use aegis_account::usecase::login::LoginUseCase;
use aegis_account::usecase::logout::LogoutUseCase;
use aegis_account::usecase::register::RegisterUseCase;
use aegis_account::usecase::verify_otp::VerifyOtpUseCase;
use aegis_domain::user::UserAccount;

pub const PASSWORD: &str = "CorrectHorse9!x";
pub const WRONG_PASSWORD: &str = "WrongStable8?yy";
pub const OTP_SECRET: &str = "integration-otp-secret";
pub const MAX_LOGIN_ATTEMPTS: u32 = 3;

// ── RecordingMailer ──────────────────────────────────────────────────────────

/// Captures dispatched codes; flips to failure mode on demand.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingMailer {
    pub fn fail_next_sends(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }
}

impl OtpMailer for RecordingMailer {
    async fn send_code(&self, email: &str, code: &str) -> Result<(), anyhow::Error> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("mail pipeline offline"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((email.to_owned(), code.to_owned()));
        Ok(())
    }
}

// ── Harness ──────────────────────────────────────────────────────────────────

type Repo = MemoryAccountRepository;
type Cache = MemoryKvCache;
type Mx = StaticMxResolver;

pub struct Harness {
    pub repo: Repo,
    pub cache: Cache,
    pub mailer: RecordingMailer,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            repo: Repo::new(),
            cache: Cache::new(),
            mailer: RecordingMailer::default(),
        }
    }

    fn validator(&self) -> Validator<Mx> {
        Validator::new(StaticMxResolver::found())
    }

    pub fn sessions(&self) -> SessionStore<Cache> {
        SessionStore::new(self.cache.clone(), 3600)
    }

    pub fn otp(&self) -> OtpService<Cache> {
        OtpService::new(self.cache.clone(), OTP_SECRET, 600)
    }

    pub fn register(&self) -> RegisterUseCase<Repo, Cache, Mx, RecordingMailer> {
        RegisterUseCase {
            repo: self.repo.clone(),
            otp: self.otp(),
            mailer: self.mailer.clone(),
            validator: self.validator(),
            templates: ValidationTemplates::new(),
        }
    }

    pub fn login(&self) -> LoginUseCase<Repo, Cache, Mx, RecordingMailer> {
        LoginUseCase {
            repo: self.repo.clone(),
            sessions: self.sessions(),
            otp: self.otp(),
            mailer: self.mailer.clone(),
            validator: self.validator(),
            templates: ValidationTemplates::new(),
            max_login_attempts: MAX_LOGIN_ATTEMPTS,
        }
    }

    pub fn verify_otp(&self) -> VerifyOtpUseCase<Repo, Cache, Mx, RecordingMailer> {
        VerifyOtpUseCase {
            repo: self.repo.clone(),
            sessions: self.sessions(),
            otp: self.otp(),
            mailer: self.mailer.clone(),
            validator: self.validator(),
            templates: ValidationTemplates::new(),
        }
    }

    pub fn logout(&self) -> LogoutUseCase<Cache, Mx> {
        LogoutUseCase {
            sessions: self.sessions(),
            validator: self.validator(),
            templates: ValidationTemplates::new(),
        }
    }

    /// Seed a verified account holding [`PASSWORD`].
    pub async fn seed_verified(&self, email: &str) -> UserAccount {
        let account = AccountFixture::new(email, &hash(PASSWORD)).build();
        self.repo.seed(account.clone()).await;
        account
    }

    /// Seed an unverified account holding [`PASSWORD`].
    pub async fn seed_unverified(&self, email: &str) -> UserAccount {
        let account = AccountFixture::new(email, &hash(PASSWORD)).unverified().build();
        self.repo.seed(account.clone()).await;
        account
    }
}

pub fn hash(password: &str) -> String {
    hashing::hash_password(password).expect("hash fixture password")
}
