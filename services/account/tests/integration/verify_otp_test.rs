use uuid::Uuid;

use aegis_account::domain::repository::AccountRepository as _;
use aegis_account::session::SessionRead;
use aegis_account::usecase::login::{LoginInput, LoginOutcome};
use aegis_account::usecase::verify_otp::{VerifyOtpInput, VerifyOtpOutcome};
use aegis_domain::user::UserStatus;

use crate::helpers::{Harness, PASSWORD};

fn input(email: &str, code: &str, session_uuid: &str, action: &str) -> VerifyOtpInput {
    VerifyOtpInput {
        email: email.to_owned(),
        otp_code: code.to_owned(),
        session_uuid: session_uuid.to_owned(),
        return_action: action.to_owned(),
    }
}

/// Log an unverified account in and hand back its pending session uuid.
async fn pending_login(harness: &Harness, email: &str) -> String {
    harness.seed_unverified(email).await;
    let outcome = harness
        .login()
        .execute(LoginInput {
            email: email.to_owned(),
            password: PASSWORD.to_owned(),
        })
        .await
        .unwrap();
    let LoginOutcome::LoggedIn(success) = outcome else {
        panic!("expected LoggedIn, got {outcome:?}");
    };
    assert!(success.otp_required);
    success.session.session_uuid.to_string()
}

#[tokio::test]
async fn should_verify_pending_login_and_refresh_session() {
    let harness = Harness::new();
    let session_uuid = pending_login(&harness, "user@example.com").await;
    let code = harness.mailer.last_code_for("user@example.com").unwrap();

    let outcome = harness
        .verify_otp()
        .execute(input("user@example.com", &code, &session_uuid, "LOGIN"))
        .await
        .unwrap();

    let VerifyOtpOutcome::Verified { user, session } = outcome else {
        panic!("expected Verified, got {outcome:?}");
    };
    assert!(user.email_verified);
    assert_eq!(user.user_status, UserStatus::Inactive);

    // The session was rewritten in place with the verified snapshot.
    let session = session.expect("login action returns a session");
    assert_eq!(session.session_uuid.to_string(), session_uuid);
    let read = harness
        .sessions()
        .read_by_session(session.session_uuid)
        .await
        .unwrap();
    let SessionRead::Data(snapshot) = read else {
        panic!("expected session data, got {read:?}");
    };
    assert!(snapshot.email_verified);

    // And the account row transitioned.
    let stored = harness
        .repo
        .find_by_email("user@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.email_verified);
    assert_eq!(stored.status, UserStatus::Inactive);
}

#[tokio::test]
async fn should_verify_registration_without_session() {
    let harness = Harness::new();
    harness.seed_unverified("user@example.com").await;
    let code = harness.otp().issue("user@example.com").await.unwrap();

    let outcome = harness
        .verify_otp()
        .execute(input("user@example.com", &code, "", "REGISTER"))
        .await
        .unwrap();

    let VerifyOtpOutcome::Verified { session, .. } = outcome else {
        panic!("expected Verified, got {outcome:?}");
    };
    assert!(session.is_none());
}

#[tokio::test]
async fn should_reject_wrong_code() {
    let harness = Harness::new();
    harness.seed_unverified("user@example.com").await;
    let code = harness.otp().issue("user@example.com").await.unwrap();
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let outcome = harness
        .verify_otp()
        .execute(input("user@example.com", wrong, "", "REGISTER"))
        .await
        .unwrap();

    assert!(matches!(outcome, VerifyOtpOutcome::CodeInvalid));

    let stored = harness
        .repo
        .find_by_email("user@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.email_verified);
}

#[tokio::test]
async fn should_reissue_when_ticket_expired() {
    let harness = Harness::new();
    harness.seed_unverified("user@example.com").await;

    // No ticket was ever issued: the lookup misses, a fresh code goes out.
    let outcome = harness
        .verify_otp()
        .execute(input("user@example.com", "123456", "", "REGISTER"))
        .await
        .unwrap();

    let VerifyOtpOutcome::CodeExpired { reissued } = outcome else {
        panic!("expected CodeExpired, got {outcome:?}");
    };
    assert!(reissued);

    // The replacement code verifies.
    let code = harness.mailer.last_code_for("user@example.com").unwrap();
    let outcome = harness
        .verify_otp()
        .execute(input("user@example.com", &code, "", "REGISTER"))
        .await
        .unwrap();
    assert!(matches!(outcome, VerifyOtpOutcome::Verified { .. }));
}

#[tokio::test]
async fn should_flag_failed_reissue_dispatch() {
    let harness = Harness::new();
    harness.seed_unverified("user@example.com").await;
    harness.mailer.fail_next_sends();

    let outcome = harness
        .verify_otp()
        .execute(input("user@example.com", "123456", "", "REGISTER"))
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        VerifyOtpOutcome::CodeExpired { reissued: false }
    ));
}

#[tokio::test]
async fn should_reject_already_verified_email() {
    let harness = Harness::new();
    harness.seed_verified("user@example.com").await;
    let code = harness.otp().issue("user@example.com").await.unwrap();

    let outcome = harness
        .verify_otp()
        .execute(input("user@example.com", &code, "", "REGISTER"))
        .await
        .unwrap();

    assert!(matches!(outcome, VerifyOtpOutcome::AlreadyVerified));
}

#[tokio::test]
async fn should_reject_unknown_email() {
    let harness = Harness::new();

    let outcome = harness
        .verify_otp()
        .execute(input("nobody@example.com", "123456", "", "REGISTER"))
        .await
        .unwrap();

    assert!(matches!(outcome, VerifyOtpOutcome::UnknownEmail));
}

#[tokio::test]
async fn should_guard_login_verification_against_session_mismatch() {
    let harness = Harness::new();

    // A pending session for one account, a verification attempt naming
    // another email under that session.
    let session_uuid = pending_login(&harness, "owner@example.com").await;
    harness.seed_unverified("intruder@example.com").await;
    let code = harness.otp().issue("intruder@example.com").await.unwrap();

    let outcome = harness
        .verify_otp()
        .execute(input(
            "intruder@example.com",
            &code,
            &session_uuid,
            "LOGIN",
        ))
        .await
        .unwrap();

    assert!(matches!(outcome, VerifyOtpOutcome::SessionEmailMismatch));
}

#[tokio::test]
async fn should_report_expired_session_for_login_verification() {
    let harness = Harness::new();
    harness.seed_unverified("user@example.com").await;
    let code = harness.otp().issue("user@example.com").await.unwrap();

    let outcome = harness
        .verify_otp()
        .execute(input(
            "user@example.com",
            &code,
            &Uuid::new_v4().to_string(),
            "LOGIN",
        ))
        .await
        .unwrap();

    assert!(matches!(outcome, VerifyOtpOutcome::SessionExpired));
}

#[tokio::test]
async fn should_reject_malformed_code_shape() {
    let harness = Harness::new();
    harness.seed_unverified("user@example.com").await;

    let outcome = harness
        .verify_otp()
        .execute(input("user@example.com", "12 456", "", "REGISTER"))
        .await
        .unwrap();

    assert!(matches!(outcome, VerifyOtpOutcome::Rejected(_)));
}
