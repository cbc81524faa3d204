//! End-to-end OTP and registration flows over the in-memory ports.

mod common;

use chrono::Duration;

use book_catalog::domain::{DomainEvent, Guest, Registration};
use book_catalog::errors::AppError;
use book_catalog::services::ServiceContainer;

use common::{TestApp, PASSWORD};

fn registration(email: &str) -> Registration {
    Registration {
        name: "Jane Reader".to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
        password_confirmation: PASSWORD.to_string(),
    }
}

#[tokio::test]
async fn test_new_code_supersedes_previous_one() {
    let app = TestApp::new();
    let otp = app.services.otp();

    otp.request_code("a@x.com").await.unwrap();
    let first = app.mailer.last_code_for("a@x.com").unwrap();
    otp.request_code("a@x.com").await.unwrap();
    let second = app.mailer.last_code_for("a@x.com").unwrap();

    let records = app.uow.otps_for("a@x.com");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].code, second);

    if first != second {
        let err = otp.verify_code("a@x.com", &first).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidOrExpiredOtp));
    }
    otp.verify_code("a@x.com", &second).await.unwrap();
}

#[tokio::test]
async fn test_wrong_code_then_right_code_then_repeat() {
    let app = TestApp::new();
    let otp = app.services.otp();

    otp.request_code("a@x.com").await.unwrap();
    let code = app.mailer.last_code_for("a@x.com").unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let err = otp.verify_code("a@x.com", wrong).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidOrExpiredOtp));
    assert!(!app.uow.otps_for("a@x.com")[0].is_verified);

    otp.verify_code("a@x.com", &code).await.unwrap();
    assert!(app.uow.otps_for("a@x.com")[0].is_verified);

    // Verifying again within the expiry window is harmless.
    otp.verify_code("a@x.com", &code).await.unwrap();
}

#[tokio::test]
async fn test_expired_code_is_rejected() {
    let app = TestApp::new();
    let otp = app.services.otp();

    otp.request_code("a@x.com").await.unwrap();
    let code = app.mailer.last_code_for("a@x.com").unwrap();
    app.uow.age_otp("a@x.com", Duration::minutes(11));

    let err = otp.verify_code("a@x.com", &code).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidOrExpiredOtp));
}

#[tokio::test]
async fn test_email_is_normalized_for_otp() {
    let app = TestApp::new();
    let otp = app.services.otp();

    let issued = otp.request_code("  Jane@Example.COM ").await.unwrap();
    assert_eq!(issued.email, "jane@example.com");

    let code = app.mailer.last_code_for("jane@example.com").unwrap();
    otp.verify_code("JANE@example.com", &code).await.unwrap();
}

#[tokio::test]
async fn test_verified_registration_confirms_and_consumes_code() {
    let app = TestApp::new();
    let otp = app.services.otp();

    otp.request_code("a@x.com").await.unwrap();
    let code = app.mailer.last_code_for("a@x.com").unwrap();
    otp.verify_code("a@x.com", &code).await.unwrap();

    let outcome = app
        .services
        .registration()
        .register(Guest::default(), registration("a@x.com"))
        .await
        .unwrap();

    assert!(outcome.user.is_confirmed());
    assert!(app.uow.otps_for("a@x.com").is_empty());

    let session = outcome.session.expect("confirmed registration signs in");
    assert!(app.sessions.contains(&session.id));

    assert_eq!(
        app.events.events(),
        vec![DomainEvent::UserRegistered {
            user_id: outcome.user.id,
            name: "Jane Reader".to_string(),
            email: "a@x.com".to_string(),
            confirmed: true,
        }]
    );
}

#[tokio::test]
async fn test_registration_without_code_is_unconfirmed() {
    let app = TestApp::new();

    let outcome = app
        .services
        .registration()
        .register(Guest::default(), registration("b@x.com"))
        .await
        .unwrap();

    assert!(!outcome.user.is_confirmed());
    assert!(outcome.session.is_none());
    assert_eq!(app.sessions.len(), 0);

    // Unconfirmed accounts can still log in with their password.
    app.services
        .auth()
        .login(
            Guest::default(),
            "b@x.com".to_string(),
            PASSWORD.to_string(),
            false,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unverified_code_does_not_confirm() {
    let app = TestApp::new();

    app.services.otp().request_code("a@x.com").await.unwrap();

    let outcome = app
        .services
        .registration()
        .register(Guest::default(), registration("a@x.com"))
        .await
        .unwrap();

    assert!(!outcome.user.is_confirmed());
    // The pending record is left alone.
    assert_eq!(app.uow.otps_for("a@x.com").len(), 1);
}

#[tokio::test]
async fn test_stale_verification_is_ignored() {
    let app = TestApp::new();
    let otp = app.services.otp();

    otp.request_code("a@x.com").await.unwrap();
    let code = app.mailer.last_code_for("a@x.com").unwrap();
    otp.verify_code("a@x.com", &code).await.unwrap();
    app.uow.age_otp("a@x.com", Duration::minutes(11));

    let outcome = app
        .services
        .registration()
        .register(Guest::default(), registration("a@x.com"))
        .await
        .unwrap();

    assert!(!outcome.user.is_confirmed());
    assert!(outcome.session.is_none());
}

#[tokio::test]
async fn test_confirmed_address_cannot_request_code() {
    let app = TestApp::new();
    let otp = app.services.otp();

    otp.request_code("a@x.com").await.unwrap();
    let code = app.mailer.last_code_for("a@x.com").unwrap();
    otp.verify_code("a@x.com", &code).await.unwrap();
    app.services
        .registration()
        .register(Guest::default(), registration("a@x.com"))
        .await
        .unwrap();

    let err = otp.request_code("a@x.com").await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyRegistered));
}

#[tokio::test]
async fn test_unconfirmed_owner_may_still_request_code() {
    let app = TestApp::new();

    app.services
        .registration()
        .register(Guest::default(), registration("a@x.com"))
        .await
        .unwrap();

    app.services.otp().request_code("a@x.com").await.unwrap();
    assert_eq!(app.uow.otps_for("a@x.com").len(), 1);
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = TestApp::new();
    let registrations = app.services.registration();

    registrations
        .register(Guest::default(), registration("a@x.com"))
        .await
        .unwrap();
    let err = registrations
        .register(Guest::default(), registration("A@X.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::EmailTaken));
}

#[tokio::test]
async fn test_mail_failure_reports_delivery_and_keeps_record() {
    let app = TestApp::new();
    app.mailer.fail_deliveries(true);

    let err = app.services.otp().request_code("a@x.com").await.unwrap_err();

    assert!(matches!(err, AppError::DeliveryFailed));
    assert_eq!(app.uow.otps_for("a@x.com").len(), 1);
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_registration_rotates_guest_session() {
    let app = TestApp::new();
    let otp = app.services.otp();

    // A guest that previously held a session.
    let earlier = app
        .services
        .registration()
        .register(Guest::default(), registration("old@x.com"))
        .await
        .unwrap();
    let old = app
        .services
        .auth()
        .start_session(&earlier.user, false, None)
        .await
        .unwrap();

    otp.request_code("a@x.com").await.unwrap();
    let code = app.mailer.last_code_for("a@x.com").unwrap();
    otp.verify_code("a@x.com", &code).await.unwrap();

    let outcome = app
        .services
        .registration()
        .register(Guest::new(Some(old.id.clone())), registration("a@x.com"))
        .await
        .unwrap();

    let new = outcome.session.unwrap();
    assert_ne!(new.id, old.id);
    assert!(!app.sessions.contains(&old.id));
    assert!(app.sessions.contains(&new.id));
}
