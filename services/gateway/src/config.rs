/// Edge gateway configuration loaded from environment variables.
#[derive(Debug)]
pub struct GatewayConfig {
    /// Account service host. Env var: `ACCOUNT_GRPC_HOST` (default 127.0.0.1).
    pub account_host: String,
    /// Account service gRPC port. Env var: `ACCOUNT_GRPC_PORT` (default 50051).
    pub account_port: u16,
    /// Retry budget per RPC call. Env var: `RPC_MAX_RETRIES` (default 3).
    pub rpc_max_retries: u32,
    /// Base backoff in milliseconds. Env var: `RPC_BACKOFF_MS` (default 500).
    pub rpc_backoff_ms: u64,
    /// Path to a CA bundle for validating the account service certificate.
    /// Unset = plaintext. Env var: `ACCOUNT_TLS_CA`.
    pub account_tls_ca: Option<String>,
    /// HTTP listen port. Env var: `GATEWAY_PORT` (default 8080).
    pub gateway_port: u16,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            account_host: std::env::var("ACCOUNT_GRPC_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_owned()),
            account_port: std::env::var("ACCOUNT_GRPC_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50051),
            rpc_max_retries: std::env::var("RPC_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            rpc_backoff_ms: std::env::var("RPC_BACKOFF_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            account_tls_ca: std::env::var("ACCOUNT_TLS_CA").ok(),
            gateway_port: std::env::var("GATEWAY_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        }
    }
}
