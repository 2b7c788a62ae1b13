//! OTP dispatch adapters.

use crate::domain::repository::OtpMailer;

/// Development adapter: the "delivery" is a structured log line. The real
/// mail pipeline consumes the same port from its own process.
#[derive(Clone, Default)]
pub struct LogMailer;

impl OtpMailer for LogMailer {
    async fn send_code(&self, email: &str, code: &str) -> Result<(), anyhow::Error> {
        tracing::info!(email, code, "otp code dispatched");
        Ok(())
    }
}
