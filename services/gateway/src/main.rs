use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use aegis_gateway::config::GatewayConfig;
use aegis_gateway::router::build_router;
use aegis_gateway::state::GatewayState;
use aegis_transport::{RpcTransport, TransportOptions};

#[tokio::main]
async fn main() {
    aegis_core::tracing::init_tracing();

    let config = GatewayConfig::from_env();

    let ca_pem = config
        .account_tls_ca
        .as_ref()
        .map(|path| std::fs::read(path).expect("unreadable ACCOUNT_TLS_CA"));

    let account = RpcTransport::new(
        &config.account_host,
        config.account_port,
        TransportOptions {
            max_retries: config.rpc_max_retries,
            backoff_base: Duration::from_millis(config.rpc_backoff_ms),
            ca_pem,
        },
    )
    .expect("invalid account service endpoint");

    let state = GatewayState {
        account: Arc::new(account),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.gateway_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("gateway listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
