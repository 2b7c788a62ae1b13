use axum::{Router, routing::get, routing::post};
use tower_http::trace::TraceLayer;

use aegis_core::health::{healthz, readyz};
use aegis_core::middleware::request_id_layer;

use crate::handlers::auth::{login, logout, register, verify_otp};
use crate::state::GatewayState;

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Account authentication
        .route("/account/register", post(register))
        .route("/account/login", post(login))
        .route("/account/otp", post(verify_otp))
        .route("/account/logout", post(logout))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
