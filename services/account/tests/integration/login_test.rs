use chrono::Utc;

use aegis_account::domain::repository::AccountRepository as _;
use aegis_account::session::SessionRead;
use aegis_account::usecase::login::{LoginInput, LoginOutcome};
use aegis_domain::user::UserStatus;

use crate::helpers::{Harness, PASSWORD, WRONG_PASSWORD};

fn input(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

#[tokio::test]
async fn should_log_in_with_correct_password() {
    let harness = Harness::new();
    let account = harness.seed_verified("user@example.com").await;

    let outcome = harness
        .login()
        .execute(input("user@example.com", PASSWORD))
        .await
        .unwrap();

    let LoginOutcome::LoggedIn(success) = outcome else {
        panic!("expected LoggedIn, got {outcome:?}");
    };
    assert!(!success.otp_required);
    assert_eq!(success.user.uuid, account.uuid);

    // Session readable under the returned handle.
    let read = harness
        .sessions()
        .read(success.session.session_uuid, account.uuid)
        .await
        .unwrap();
    assert!(matches!(read, SessionRead::Data(_)));

    // last_login advanced on the stored row.
    let stored = harness
        .repo
        .find_by_uuid(account.uuid)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.last_login >= account.last_login);
}

#[tokio::test]
async fn should_deny_unknown_email() {
    let harness = Harness::new();
    let outcome = harness
        .login()
        .execute(input("nobody@example.com", PASSWORD))
        .await
        .unwrap();
    assert!(matches!(outcome, LoginOutcome::UnknownEmail));
}

#[tokio::test]
async fn should_record_failure_on_wrong_password() {
    let harness = Harness::new();
    let account = harness.seed_verified("user@example.com").await;

    let outcome = harness
        .login()
        .execute(input("user@example.com", WRONG_PASSWORD))
        .await
        .unwrap();

    assert!(matches!(outcome, LoginOutcome::WrongPassword));
    assert_eq!(harness.repo.attempt_rows(account.uuid).await, 1);

    let stored = harness
        .repo
        .find_by_uuid(account.uuid)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.failed_login_attempts, 1);
    assert_eq!(stored.status, UserStatus::Inactive);
}

#[tokio::test]
async fn should_lock_after_repeated_failures_and_deny_correct_password() {
    let harness = Harness::new();
    let account = harness.seed_verified("user@example.com").await;

    // Threshold is 3: the third consecutive failure trips the lock.
    for _ in 0..3 {
        let outcome = harness
            .login()
            .execute(input("user@example.com", WRONG_PASSWORD))
            .await
            .unwrap();
        assert!(matches!(outcome, LoginOutcome::WrongPassword));
    }

    let stored = harness
        .repo
        .find_by_uuid(account.uuid)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, UserStatus::Locked);
    assert!(stored.account_locked_until > Utc::now().timestamp());

    // A fourth attempt reports the lock rather than the password.
    let outcome = harness
        .login()
        .execute(input("user@example.com", WRONG_PASSWORD))
        .await
        .unwrap();
    assert!(matches!(outcome, LoginOutcome::TemporarilyLocked));

    // The correct password is denied for as long as the window holds.
    let outcome = harness
        .login()
        .execute(input("user@example.com", PASSWORD))
        .await
        .unwrap();
    assert!(matches!(outcome, LoginOutcome::TemporarilyLocked));
}

#[tokio::test]
async fn should_unlock_after_the_window_and_log_in() {
    let harness = Harness::new();
    let mut account = harness.seed_verified("user@example.com").await;

    // Simulate a lock whose window has already lapsed.
    account.status = UserStatus::Locked;
    account.account_locked_until = Utc::now().timestamp() - 10;
    harness.repo.update(&account).await.unwrap();

    let outcome = harness
        .login()
        .execute(input("user@example.com", PASSWORD))
        .await
        .unwrap();

    assert!(matches!(outcome, LoginOutcome::LoggedIn(_)));

    let stored = harness
        .repo
        .find_by_uuid(account.uuid)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.status, UserStatus::Locked);
}

#[tokio::test]
async fn should_deny_closed_and_terminated_accounts() {
    let harness = Harness::new();

    let mut closed = harness.seed_verified("closed@example.com").await;
    closed.status = UserStatus::Closed;
    harness.repo.update(&closed).await.unwrap();

    let mut terminated = harness.seed_verified("terminated@example.com").await;
    terminated.status = UserStatus::Terminated;
    harness.repo.update(&terminated).await.unwrap();

    let outcome = harness
        .login()
        .execute(input("closed@example.com", PASSWORD))
        .await
        .unwrap();
    assert!(matches!(outcome, LoginOutcome::AccountClosed));

    let outcome = harness
        .login()
        .execute(input("terminated@example.com", PASSWORD))
        .await
        .unwrap();
    assert!(matches!(outcome, LoginOutcome::AccountTerminated));
}

#[tokio::test]
async fn should_require_otp_for_unverified_account_but_still_issue_session() {
    let harness = Harness::new();
    let account = harness.seed_unverified("user@example.com").await;

    let outcome = harness
        .login()
        .execute(input("user@example.com", PASSWORD))
        .await
        .unwrap();

    let LoginOutcome::LoggedIn(success) = outcome else {
        panic!("expected LoggedIn, got {outcome:?}");
    };
    assert!(success.otp_required);
    assert!(success.otp_dispatched);

    // A code went out and the (degraded) session is live for verification.
    assert_eq!(
        harness.mailer.last_code_for("user@example.com").map(|c| c.len()),
        Some(6)
    );
    let read = harness
        .sessions()
        .read(success.session.session_uuid, account.uuid)
        .await
        .unwrap();
    assert!(matches!(read, SessionRead::Data(_)));
}

#[tokio::test]
async fn should_reject_malformed_login_payload() {
    let harness = Harness::new();
    harness.seed_verified("user@example.com").await;

    // Email with two '@' fails validation before any lookup.
    let outcome = harness
        .login()
        .execute(input("user@@example.com", PASSWORD))
        .await
        .unwrap();
    assert!(matches!(outcome, LoginOutcome::Rejected(_)));
}
