use std::sync::Arc;

use aegis_transport::RpcTransport;

/// Shared gateway state: the one logical connection to the account service.
#[derive(Clone)]
pub struct GatewayState {
    pub account: Arc<RpcTransport>,
}
