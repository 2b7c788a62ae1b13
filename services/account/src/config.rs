use crate::otp::OTP_TTL_SECS;
use crate::session::SESSION_TTL_SECS;

/// Account service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AccountConfig {
    /// Redis connection URL. Unset falls back to the in-process cache
    /// (single-replica development only).
    pub redis_url: Option<String>,
    /// Shared secret for deriving one-time codes. Env var: `OTP_SECRET`.
    pub otp_secret: String,
    /// Valid failures at which an account locks (default 3).
    /// Env var: `ACCOUNT_MAX_LOGIN_ATTEMPTS`.
    pub max_login_attempts: u32,
    /// Session facet TTL in seconds (default 3600). Env var: `SESSION_TTL_SECS`.
    pub session_ttl_secs: u64,
    /// OTP ticket TTL in seconds (default 600). Env var: `OTP_TTL_SECS`.
    pub otp_ttl_secs: u64,
    /// TCP port for the gRPC listener (default 50051). Env var: `ACCOUNT_GRPC_PORT`.
    pub grpc_port: u16,
}

impl AccountConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL").ok(),
            otp_secret: std::env::var("OTP_SECRET").expect("OTP_SECRET"),
            max_login_attempts: std::env::var("ACCOUNT_MAX_LOGIN_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            session_ttl_secs: std::env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(SESSION_TTL_SECS),
            otp_ttl_secs: std::env::var("OTP_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(OTP_TTL_SECS),
            grpc_port: std::env::var("ACCOUNT_GRPC_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50051),
        }
    }
}
