use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Gateway-side error variants for failures that are not carried inside an
/// upstream response envelope.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The account service could not be reached or kept failing after
    /// retries. The request may or may not have been applied upstream, so
    /// clients must not blindly resubmit mutating calls.
    #[error("Service Unavailable")]
    Upstream {
        detail: String,
        /// HTTP status the service-side classification maps to; reported
        /// in-band since the gateway itself answers 502.
        service_status: u16,
    },
    /// The upstream answered but the payload could not be interpreted.
    #[error("Invalid Upstream Response")]
    BadUpstreamPayload,
    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl GatewayError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Upstream { .. } => "UPSTREAM_UNAVAILABLE",
            Self::BadUpstreamPayload => "BAD_UPSTREAM_PAYLOAD",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Upstream { .. } | Self::BadUpstreamPayload => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — the trace layer already records method/uri/status
        // for every request. Upstream failures carry their detail in-band.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = match &self {
            Self::Upstream {
                detail,
                service_status,
            } => serde_json::json!({
                "status": {
                    "success": false,
                    "http_status": status.as_u16(),
                    "message": self.to_string(),
                    "errors": [detail],
                },
                "service_status": service_status,
            }),
            _ => serde_json::json!({
                "status": {
                    "success": false,
                    "http_status": status.as_u16(),
                    "message": self.to_string(),
                    "errors": [self.kind()],
                },
            }),
        };
        (status, axum::Json(body)).into_response()
    }
}
