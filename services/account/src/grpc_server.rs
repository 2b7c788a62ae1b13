//! gRPC surface: maps workflow outcomes onto the response envelope.
//!
//! Every business denial travels back as a successful RPC carrying a
//! `RequestStatus`; the gateway re-renders that status over HTTP. gRPC
//! status codes are left to the transport layer.

use tonic::{Request, Response, Status};

use aegis_domain::snapshot::PublicUserData;
use aegis_proto::account::v1::account_auth_service_server::AccountAuthService;
use aegis_proto::account::v1::{
    LoginRequest, LoginResponse, LogoutRequest, LogoutResponse, RegisterRequest, RegisterResponse,
    RequestStatus, SessionInfo, UserSnapshot, VerifyOtpRequest,
};

use crate::session::SessionHandle;
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginOutcome, LoginUseCase};
use crate::usecase::logout::{LogoutInput, LogoutOutcome, LogoutUseCase};
use crate::usecase::register::{RegisterInput, RegisterOutcome, RegisterUseCase};
use crate::usecase::verify_otp::{VerifyOtpInput, VerifyOtpOutcome, VerifyOtpUseCase};

#[derive(Clone)]
pub struct AccountGrpcServer {
    pub state: AppState,
}

fn ok(http_status: u32, message: &str) -> RequestStatus {
    RequestStatus {
        success: true,
        http_status,
        message: message.to_owned(),
        errors: Vec::new(),
    }
}

fn fail(http_status: u32, message: &str) -> RequestStatus {
    RequestStatus {
        success: false,
        http_status,
        message: message.to_owned(),
        errors: Vec::new(),
    }
}

fn fail_with(http_status: u32, message: &str, errors: Vec<String>) -> RequestStatus {
    RequestStatus {
        success: false,
        http_status,
        message: message.to_owned(),
        errors,
    }
}

fn internal() -> RequestStatus {
    fail(500, "Internal Server Error")
}

fn user_proto(user: &PublicUserData) -> UserSnapshot {
    UserSnapshot {
        uuid: user.uuid.to_string(),
        email: user.email.clone(),
        password_last_changed_at: user.password_last_changed_at,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        gender: user.gender.as_str().to_owned(),
        date_of_birth: user.date_of_birth.clone(),
        created_at: user.created_at,
        updated_at: user.updated_at,
        last_login: user.last_login,
        email_verified: user.email_verified,
        user_status: user.user_status.as_str().to_owned(),
        user_role: user.user_role.as_str().to_owned(),
    }
}

fn session_proto(session: &SessionHandle) -> SessionInfo {
    SessionInfo {
        session_uuid: session.session_uuid.to_string(),
        expiry_time: session.expiry_time,
    }
}

#[tonic::async_trait]
impl AccountAuthService for AccountGrpcServer {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let req = request.into_inner();
        tracing::debug!(email = %req.email, "register requested");

        let usecase = RegisterUseCase {
            repo: self.state.repo.clone(),
            otp: self.state.otp(),
            mailer: self.state.mailer(),
            validator: self.state.validator.clone(),
            templates: self.state.templates,
        };

        let outcome = usecase
            .execute(RegisterInput {
                email: req.email,
                password: req.password,
                first_name: req.first_name,
                last_name: req.last_name,
                gender: req.gender,
                date_of_birth: req.date_of_birth,
            })
            .await;

        let response = match outcome {
            Ok(RegisterOutcome::Rejected(rejection)) => RegisterResponse {
                status: Some(fail_with(
                    400,
                    "Invalid Data Received",
                    rejection.messages(),
                )),
                user: None,
            },
            Ok(RegisterOutcome::EmailInUse) => RegisterResponse {
                status: Some(fail(401, "Email Already In Use")),
                user: None,
            },
            Ok(RegisterOutcome::Registered {
                user,
                otp_dispatched,
            }) => RegisterResponse {
                status: Some(if otp_dispatched {
                    ok(200, "Request Successful")
                } else {
                    fail(500, "Unable To Send Verification Email")
                }),
                user: Some(user_proto(&user)),
            },
            Err(err) => {
                tracing::error!(error = ?err, "register failed");
                RegisterResponse {
                    status: Some(internal()),
                    user: None,
                }
            }
        };

        Ok(Response::new(response))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();
        tracing::debug!(email = %req.email, "login requested");

        let usecase = LoginUseCase {
            repo: self.state.repo.clone(),
            sessions: self.state.sessions(),
            otp: self.state.otp(),
            mailer: self.state.mailer(),
            validator: self.state.validator.clone(),
            templates: self.state.templates,
            max_login_attempts: self.state.max_login_attempts,
        };

        let outcome = usecase
            .execute(LoginInput {
                email: req.email,
                password: req.password,
            })
            .await;

        let response = match outcome {
            Ok(LoginOutcome::Rejected(rejection)) => denied(fail_with(
                400,
                "Invalid Data Received",
                rejection.messages(),
            )),
            Ok(LoginOutcome::UnknownEmail) => {
                denied(fail(400, "No Account Associated With Given Email"))
            }
            Ok(LoginOutcome::AccountClosed) => denied(fail_with(
                403,
                "This Account Has Been Closed",
                vec!["Account Data Will Be Wiped In The Near Future Following TOS".to_owned()],
            )),
            Ok(LoginOutcome::AccountTerminated) => {
                denied(fail(403, "This Account Has Been Disabled"))
            }
            Ok(LoginOutcome::TemporarilyLocked) => denied(fail(
                403,
                "This Account Is Temporarily Locked. Please Try Again Later",
            )),
            Ok(LoginOutcome::WrongPassword) => denied(fail(403, "Email Or Password Incorrect")),
            Ok(LoginOutcome::LoggedIn(success)) => {
                let status = if !success.otp_required {
                    ok(200, "Request Successful")
                } else if success.otp_dispatched {
                    fail(403, "Account Not Verified")
                } else {
                    fail(500, "Unable To Send Verification Email")
                };
                LoginResponse {
                    status: Some(status),
                    user: Some(user_proto(&success.user)),
                    session: Some(session_proto(&success.session)),
                    otp_required: success.otp_required,
                }
            }
            Err(err) => {
                tracing::error!(error = ?err, "login failed");
                denied(internal())
            }
        };

        Ok(Response::new(response))
    }

    async fn verify_otp(
        &self,
        request: Request<VerifyOtpRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();
        tracing::debug!(email = %req.email, action = %req.return_action, "otp verification requested");

        let usecase = VerifyOtpUseCase {
            repo: self.state.repo.clone(),
            sessions: self.state.sessions(),
            otp: self.state.otp(),
            mailer: self.state.mailer(),
            validator: self.state.validator.clone(),
            templates: self.state.templates,
        };

        let outcome = usecase
            .execute(VerifyOtpInput {
                email: req.email,
                otp_code: req.otp_code,
                session_uuid: req.session_uuid,
                return_action: req.return_action,
            })
            .await;

        let response = match outcome {
            Ok(VerifyOtpOutcome::Rejected(rejection)) => denied(fail_with(
                400,
                "Invalid Data Received",
                rejection.messages(),
            )),
            Ok(VerifyOtpOutcome::SessionExpired) => {
                denied(fail(400, "Session Either Expired Or Never Existed"))
            }
            Ok(VerifyOtpOutcome::SessionNoUserData) => {
                denied(fail(400, "Session Has No User Data"))
            }
            Ok(VerifyOtpOutcome::SessionEmailMismatch) => denied(fail(
                400,
                "Logged In Account Mismatch With Provided Email",
            )),
            Ok(VerifyOtpOutcome::UnknownEmail) => {
                denied(fail(400, "Email Is Not Linked To Any Account"))
            }
            Ok(VerifyOtpOutcome::AlreadyVerified) => {
                denied(fail(400, "Email Has Already Been Verified"))
            }
            Ok(VerifyOtpOutcome::CodeExpired { reissued }) => {
                let mut status = fail(400, "OTP Code Timed Out. Renewing Verification Email");
                if !reissued {
                    status
                        .errors
                        .push("Unable To Send Verification Email".to_owned());
                }
                denied(status)
            }
            Ok(VerifyOtpOutcome::CodeInvalid) => denied(fail(400, "Invalid OTP Code Provided")),
            Ok(VerifyOtpOutcome::Verified { user, session }) => {
                // 202 when this completed a login, 201 for plain verification.
                let status = if session.is_some() {
                    ok(202, "Request Successful")
                } else {
                    ok(201, "Request Successful")
                };
                LoginResponse {
                    status: Some(status),
                    user: Some(user_proto(&user)),
                    session: session.as_ref().map(session_proto),
                    otp_required: false,
                }
            }
            Err(err) => {
                tracing::error!(error = ?err, "otp verification failed");
                denied(internal())
            }
        };

        Ok(Response::new(response))
    }

    async fn logout(
        &self,
        request: Request<LogoutRequest>,
    ) -> Result<Response<LogoutResponse>, Status> {
        let req = request.into_inner();

        let usecase = LogoutUseCase {
            sessions: self.state.sessions(),
            validator: self.state.validator.clone(),
            templates: self.state.templates,
        };

        let outcome = usecase
            .execute(LogoutInput {
                session_uuid: req.session_uuid,
                user_uuid: req.user_uuid,
            })
            .await;

        let status = match outcome {
            Ok(LogoutOutcome::Rejected(rejection)) => {
                fail_with(400, "Invalid Data Received", rejection.messages())
            }
            Ok(LogoutOutcome::NotLoggedIn) => fail(500, "Unable To Log Out"),
            Ok(LogoutOutcome::LoggedOut) => ok(200, "Request Successful"),
            Err(err) => {
                tracing::error!(error = ?err, "logout failed");
                internal()
            }
        };

        Ok(Response::new(LogoutResponse {
            status: Some(status),
        }))
    }
}

/// A denial envelope: status only, no user or session payload.
fn denied(status: RequestStatus) -> LoginResponse {
    LoginResponse {
        status: Some(status),
        user: None,
        session: None,
        otp_required: false,
    }
}
