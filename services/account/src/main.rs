use tracing::{info, warn};

use aegis_proto::account::v1::account_auth_service_server::AccountAuthServiceServer;
use aegis_validate::{DnsMxResolver, Validator};

use aegis_account::config::AccountConfig;
use aegis_account::grpc_server::AccountGrpcServer;
use aegis_account::infra::cache::{CacheBackend, MemoryKvCache, RedisKvCache};
use aegis_account::infra::memory::MemoryAccountRepository;
use aegis_account::schemas::ValidationTemplates;
use aegis_account::state::AppState;

#[tokio::main]
async fn main() {
    aegis_core::tracing::init_tracing();

    let config = AccountConfig::from_env();

    let cache = match &config.redis_url {
        Some(url) => {
            let redis_cfg = deadpool_redis::Config::from_url(url);
            let pool = redis_cfg
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .expect("failed to create Redis pool");
            CacheBackend::Redis(RedisKvCache { pool })
        }
        None => {
            warn!("REDIS_URL unset, sessions and otp tickets are in-process only");
            CacheBackend::Memory(MemoryKvCache::new())
        }
    };

    let resolver = DnsMxResolver::from_system_conf().expect("unusable system DNS configuration");

    let state = AppState {
        repo: MemoryAccountRepository::new(),
        cache,
        validator: Validator::new(resolver),
        templates: ValidationTemplates::new(),
        otp_secret: config.otp_secret,
        otp_ttl_secs: config.otp_ttl_secs,
        session_ttl_secs: config.session_ttl_secs,
        max_login_attempts: config.max_login_attempts,
    };

    let addr = format!("0.0.0.0:{}", config.grpc_port)
        .parse()
        .expect("valid listen address");

    info!("account service listening on {addr}");
    tonic::transport::Server::builder()
        .add_service(AccountAuthServiceServer::new(AccountGrpcServer { state }))
        .serve(addr)
        .await
        .expect("server error");
}
