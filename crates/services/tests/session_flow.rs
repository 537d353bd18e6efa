use std::sync::Arc;

use api::memory::{DEMO_PASSWORD, DEMO_USERNAME};
use api::{AuthGateway, Backend, InMemoryBackend, RecordedCall};
use matelog_core::model::{Age, Credentials, Gender, Group, Registration, Specialty};
use matelog_core::time::fixed_clock;
use services::{AppServices, AuthFailure, LessonError};

fn services_over(backend: &InMemoryBackend) -> AppServices {
    AppServices::new(
        Backend::from_shared(Arc::new(backend.clone())),
        fixed_clock(),
    )
}

fn credentials(password: &str) -> Credentials {
    Credentials {
        username: DEMO_USERNAME.into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn wrong_password_keeps_backend_message_and_opens_nothing() {
    let backend = InMemoryBackend::demo();
    let session = services_over(&backend).session();

    let failure = session.login(&credentials("otra")).await.unwrap_err();

    assert_eq!(failure, AuthFailure::Message("Credenciales inválidas".into()));
    assert!(!session.is_authenticated());
    assert!(!backend.calls().contains(&RecordedCall::StartStudySession));
}

#[tokio::test]
async fn login_opens_exactly_one_study_session() {
    let backend = InMemoryBackend::demo();
    let session = services_over(&backend).session();

    let user = session.login(&credentials(DEMO_PASSWORD)).await.unwrap();
    assert_eq!(user.username, DEMO_USERNAME);
    assert!(session.study_session().is_some());
    assert_eq!(backend.open_study_sessions(), 1);

    session.login(&credentials(DEMO_PASSWORD)).await.unwrap();
    assert_eq!(backend.open_study_sessions(), 1);
}

#[tokio::test]
async fn logout_closes_the_study_session_and_clears_state() {
    let backend = InMemoryBackend::demo();
    let session = services_over(&backend).session();
    session.login(&credentials(DEMO_PASSWORD)).await.unwrap();

    session.logout().await;

    assert_eq!(backend.open_study_sessions(), 0);
    assert!(backend.signed_in_user().is_none());
    assert_eq!(session.snapshot(), services::SessionState::default());
}

#[tokio::test]
async fn offline_tracking_does_not_block_login_or_logout() {
    let backend = InMemoryBackend::demo();
    backend.set_tracking_offline(true);
    let session = services_over(&backend).session();

    session.login(&credentials(DEMO_PASSWORD)).await.unwrap();
    assert!(session.is_authenticated());
    assert_eq!(session.study_session(), None);

    session.logout().await;
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn resume_uses_an_existing_cookie_session() {
    let backend = InMemoryBackend::demo();
    let session = services_over(&backend).session();
    assert_eq!(session.resume().await, None);

    backend.restore_session(DEMO_USERNAME);
    let user = session.resume().await.unwrap();
    assert_eq!(session.current_user(), Some(user));
    assert_eq!(backend.open_study_sessions(), 1);
}

#[tokio::test]
async fn registration_reports_field_errors_and_does_not_sign_in() {
    let backend = InMemoryBackend::demo();
    let session = services_over(&backend).session();
    let mut registration = Registration {
        username: DEMO_USERNAME.into(),
        password: "secreta1".into(),
        password_confirm: "secreta1".into(),
        group: Group::B,
        specialty: Specialty::Electronica,
        gender: Gender::Female,
        age: Age::Fifteen,
    };

    let failure = session.register(&registration).await.unwrap_err();
    assert!(matches!(failure, AuthFailure::Fields(ref fields) if fields.contains_key("username")));

    registration.username = "nueva".into();
    session.register(&registration).await.unwrap();
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn expired_session_surfaces_from_lessons() {
    let backend = InMemoryBackend::demo();
    let services = services_over(&backend);
    services.session().login(&credentials(DEMO_PASSWORD)).await.unwrap();

    let lessons = services.lessons().list_lessons().await.unwrap();
    assert!(lessons[0].unlocked);
    assert!(!lessons[1].unlocked);

    backend.logout().await.unwrap();
    assert!(matches!(
        services.lessons().list_lessons().await,
        Err(LessonError::SessionExpired)
    ));
}
