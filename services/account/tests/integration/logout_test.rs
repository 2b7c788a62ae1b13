use uuid::Uuid;

use aegis_account::usecase::login::{LoginInput, LoginOutcome};
use aegis_account::usecase::logout::{LogoutInput, LogoutOutcome};

use crate::helpers::{Harness, PASSWORD};

#[tokio::test]
async fn should_log_out_a_live_session_once() {
    let harness = Harness::new();
    let account = harness.seed_verified("user@example.com").await;

    let outcome = harness
        .login()
        .execute(LoginInput {
            email: "user@example.com".to_owned(),
            password: PASSWORD.to_owned(),
        })
        .await
        .unwrap();
    let LoginOutcome::LoggedIn(success) = outcome else {
        panic!("expected LoggedIn, got {outcome:?}");
    };

    let input = LogoutInput {
        session_uuid: success.session.session_uuid.to_string(),
        user_uuid: account.uuid.to_string(),
    };

    let outcome = harness
        .logout()
        .execute(LogoutInput {
            session_uuid: input.session_uuid.clone(),
            user_uuid: input.user_uuid.clone(),
        })
        .await
        .unwrap();
    assert_eq!(outcome, LogoutOutcome::LoggedOut);

    // The session is gone; logging out again reports that.
    let outcome = harness.logout().execute(input).await.unwrap();
    assert_eq!(outcome, LogoutOutcome::NotLoggedIn);
}

#[tokio::test]
async fn should_report_not_logged_in_for_unknown_session() {
    let harness = Harness::new();

    let outcome = harness
        .logout()
        .execute(LogoutInput {
            session_uuid: Uuid::new_v4().to_string(),
            user_uuid: Uuid::new_v4().to_string(),
        })
        .await
        .unwrap();

    assert_eq!(outcome, LogoutOutcome::NotLoggedIn);
}

#[tokio::test]
async fn should_reject_malformed_identifiers() {
    let harness = Harness::new();

    let outcome = harness
        .logout()
        .execute(LogoutInput {
            session_uuid: "not-a-uuid".to_owned(),
            user_uuid: Uuid::new_v4().to_string(),
        })
        .await
        .unwrap();

    assert!(matches!(outcome, LogoutOutcome::Rejected(_)));
}
