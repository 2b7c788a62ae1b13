use aegis_account::domain::repository::AccountRepository as _;
use aegis_account::usecase::register::{RegisterInput, RegisterOutcome};
use aegis_domain::user::UserStatus;

use crate::helpers::{Harness, PASSWORD};

fn input(email: &str, password: &str) -> RegisterInput {
    RegisterInput {
        email: email.to_owned(),
        password: password.to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        gender: "Female".to_owned(),
        date_of_birth: "1990-01-02".to_owned(),
    }
}

#[tokio::test]
async fn should_register_and_dispatch_otp() {
    let harness = Harness::new();

    let outcome = harness
        .register()
        .execute(input("user@example.com", PASSWORD))
        .await
        .unwrap();

    let RegisterOutcome::Registered {
        user,
        otp_dispatched,
    } = outcome
    else {
        panic!("expected Registered, got {outcome:?}");
    };

    assert!(otp_dispatched);
    assert_eq!(user.email, "user@example.com");
    assert!(!user.email_verified);
    assert_eq!(user.user_status, UserStatus::Unverified);

    // The row exists and a code went out to the right address.
    let stored = harness
        .repo
        .find_by_email("user@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, UserStatus::Unverified);
    assert_eq!(harness.mailer.sent().len(), 1);
    assert_eq!(harness.mailer.sent()[0].0, "user@example.com");
}

#[tokio::test]
async fn should_reject_weak_password_without_inserting() {
    let harness = Harness::new();

    // No uppercase, too short: both hard faults, nothing mutated.
    let outcome = harness
        .register()
        .execute(input("user@example.com", "weak1!"))
        .await
        .unwrap();

    let RegisterOutcome::Rejected(rejection) = outcome else {
        panic!("expected Rejected, got {outcome:?}");
    };
    assert!(
        rejection
            .messages()
            .iter()
            .any(|m| m.contains("must contain at least one upper_case"))
    );

    assert_eq!(harness.repo.account_rows().await, 0);
    assert!(harness.mailer.sent().is_empty());
}

#[tokio::test]
async fn should_reject_email_already_in_use() {
    let harness = Harness::new();
    harness.seed_verified("user@example.com").await;

    let outcome = harness
        .register()
        .execute(input("user@example.com", PASSWORD))
        .await
        .unwrap();

    assert!(matches!(outcome, RegisterOutcome::EmailInUse));
    assert_eq!(harness.repo.account_rows().await, 1);
}

#[tokio::test]
async fn should_degrade_when_otp_dispatch_fails() {
    let harness = Harness::new();
    harness.mailer.fail_next_sends();

    let outcome = harness
        .register()
        .execute(input("user@example.com", PASSWORD))
        .await
        .unwrap();

    let RegisterOutcome::Registered { otp_dispatched, .. } = outcome else {
        panic!("expected Registered, got {outcome:?}");
    };
    assert!(!otp_dispatched);

    // Registered regardless: the account can request a resend later.
    assert_eq!(harness.repo.account_rows().await, 1);
}

#[tokio::test]
async fn should_reject_email_with_nonexistent_domain() {
    use aegis_account::usecase::register::RegisterUseCase;
    use aegis_testing::mx::StaticMxResolver;
    use aegis_validate::Validator;

    let harness = Harness::new();
    let usecase = RegisterUseCase {
        validator: Validator::new(StaticMxResolver::nx_domain()),
        ..harness.register()
    };

    let outcome = usecase
        .execute(input("user@no-such-domain.invalid", PASSWORD))
        .await
        .unwrap();

    let RegisterOutcome::Rejected(rejection) = outcome else {
        panic!("expected Rejected, got {outcome:?}");
    };
    assert!(
        rejection
            .messages()
            .iter()
            .any(|m| m.contains("invalid domain"))
    );
    assert_eq!(harness.repo.account_rows().await, 0);
}

#[tokio::test]
async fn should_reject_unknown_gender_value() {
    let harness = Harness::new();

    // Passes the shape checks, fails the closed set.
    let mut bad = input("user@example.com", PASSWORD);
    bad.gender = "Unknown".to_owned();

    let outcome = harness.register().execute(bad).await.unwrap();
    assert!(matches!(outcome, RegisterOutcome::Rejected(_)));
    assert_eq!(harness.repo.account_rows().await, 0);
}

#[tokio::test]
async fn should_reject_underage_date_of_birth() {
    let harness = Harness::new();

    let mut bad = input("user@example.com", PASSWORD);
    bad.date_of_birth = chrono::Utc::now().date_naive().to_string();

    let outcome = harness.register().execute(bad).await.unwrap();
    let RegisterOutcome::Rejected(rejection) = outcome else {
        panic!("expected Rejected, got {outcome:?}");
    };
    assert!(
        rejection
            .messages()
            .iter()
            .any(|m| m.contains("out of range"))
    );
}
