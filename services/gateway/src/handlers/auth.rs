//! HTTP handlers for the authentication routes.
//!
//! Each handler marshals the JSON body into the account service's RPC
//! request, runs it through the resilient transport, and re-renders the
//! embedded `RequestStatus` as the HTTP response. A transport failure (the
//! call may or may not have reached the service) surfaces as a 502-class
//! degraded envelope instead.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use aegis_core::error::GatewayError;
use aegis_proto::account::v1::account_auth_service_client::AccountAuthServiceClient;
use aegis_proto::account::v1::{
    LoginRequest, LoginResponse, LogoutRequest, RegisterRequest, RequestStatus, SessionInfo,
    UserSnapshot, VerifyOtpRequest,
};
use aegis_transport::TransportError;

use crate::state::GatewayState;

#[derive(Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct OtpBody {
    pub email: String,
    pub otp_code: String,
    #[serde(default)]
    pub session_uuid: String,
    pub return_action: String,
}

#[derive(Deserialize)]
pub struct LogoutBody {
    pub session_uuid: String,
    pub user_uuid: String,
}

pub async fn register(
    State(state): State<GatewayState>,
    Json(body): Json<RegisterBody>,
) -> Response {
    let request = RegisterRequest {
        email: body.email,
        password: body.password,
        first_name: body.first_name,
        last_name: body.last_name,
        gender: body.gender,
        date_of_birth: body.date_of_birth,
    };

    let result = state
        .account
        .call("Register", move |channel| {
            let request = request.clone();
            async move {
                AccountAuthServiceClient::new(channel)
                    .register(request)
                    .await
                    .map(|response| response.into_inner())
            }
        })
        .await;

    match result {
        Ok(response) => render(
            response.status,
            json!({ "user": response.user.map(user_json) }),
        ),
        Err(err) => degraded(err),
    }
}

pub async fn login(State(state): State<GatewayState>, Json(body): Json<LoginBody>) -> Response {
    let request = LoginRequest {
        email: body.email,
        password: body.password,
    };

    let result = state
        .account
        .call("Login", move |channel| {
            let request = request.clone();
            async move {
                AccountAuthServiceClient::new(channel)
                    .login(request)
                    .await
                    .map(|response| response.into_inner())
            }
        })
        .await;

    match result {
        Ok(response) => render_login(response),
        Err(err) => degraded(err),
    }
}

pub async fn verify_otp(State(state): State<GatewayState>, Json(body): Json<OtpBody>) -> Response {
    let request = VerifyOtpRequest {
        email: body.email,
        otp_code: body.otp_code,
        session_uuid: body.session_uuid,
        return_action: body.return_action,
    };

    let result = state
        .account
        .call("VerifyOtp", move |channel| {
            let request = request.clone();
            async move {
                AccountAuthServiceClient::new(channel)
                    .verify_otp(request)
                    .await
                    .map(|response| response.into_inner())
            }
        })
        .await;

    match result {
        Ok(response) => render_login(response),
        Err(err) => degraded(err),
    }
}

pub async fn logout(State(state): State<GatewayState>, Json(body): Json<LogoutBody>) -> Response {
    let request = LogoutRequest {
        session_uuid: body.session_uuid,
        user_uuid: body.user_uuid,
    };

    let result = state
        .account
        .call("Logout", move |channel| {
            let request = request.clone();
            async move {
                AccountAuthServiceClient::new(channel)
                    .logout(request)
                    .await
                    .map(|response| response.into_inner())
            }
        })
        .await;

    match result {
        Ok(response) => render(response.status, json!({})),
        Err(err) => degraded(err),
    }
}

fn render_login(response: LoginResponse) -> Response {
    render(
        response.status,
        json!({
            "user": response.user.map(user_json),
            "session": response.session.map(session_json),
            "otp_required": response.otp_required,
        }),
    )
}

/// Render the embedded status with the HTTP code it carries, merging any
/// extra payload fields alongside it.
fn render(status: Option<RequestStatus>, extra: serde_json::Value) -> Response {
    let Some(status) = status else {
        // The service always fills the status; a hole here is a contract
        // break on its side.
        return GatewayError::BadUpstreamPayload.into_response();
    };

    let code = StatusCode::from_u16(status.http_status as u16)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut body = json!({
        "status": status_json(&status),
    });
    if let (Some(map), Some(extra_map)) = (body.as_object_mut(), extra.as_object()) {
        for (key, value) in extra_map {
            map.insert(key.clone(), value.clone());
        }
    }

    (code, Json(body)).into_response()
}

/// The account service could not be reached; the client sees a bad-gateway
/// envelope carrying the transport classification.
fn degraded(err: TransportError) -> Response {
    GatewayError::Upstream {
        detail: err.to_string(),
        service_status: err.http_status(),
    }
    .into_response()
}

fn status_json(status: &RequestStatus) -> serde_json::Value {
    json!({
        "success": status.success,
        "http_status": status.http_status,
        "message": status.message,
        "errors": status.errors,
    })
}

fn user_json(user: UserSnapshot) -> serde_json::Value {
    json!({
        "uuid": user.uuid,
        "email": user.email,
        "password_last_changed_at": user.password_last_changed_at,
        "first_name": user.first_name,
        "last_name": user.last_name,
        "gender": user.gender,
        "date_of_birth": user.date_of_birth,
        "created_at": user.created_at,
        "updated_at": user.updated_at,
        "last_login": user.last_login,
        "email_verified": user.email_verified,
        "user_status": user.user_status,
        "user_role": user.user_role,
    })
}

fn session_json(session: SessionInfo) -> serde_json::Value {
    json!({
        "session_uuid": session.session_uuid,
        "expiry_time": session.expiry_time,
    })
}
