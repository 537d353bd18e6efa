use api::{InMemoryBackend, RecordedCall};
use matelog_core::model::{ActivityContext, LessonId, ScreenKind, TopicId};
use dioxus::prelude::{ReadableExt, WritableExt};

use super::test_harness::{
    ViewKind, setup_exercise_harness, setup_signed_out_harness, setup_view_harness,
    setup_with_backend,
};

fn activity_calls(calls: &[RecordedCall]) -> (Vec<(ScreenKind, ActivityContext)>, usize) {
    let started = calls
        .iter()
        .filter_map(|call| match call {
            RecordedCall::StartActivity(kind, context) => Some((*kind, *context)),
            _ => None,
        })
        .collect();
    let ended = calls
        .iter()
        .filter(|call| matches!(call, RecordedCall::EndActivity(_)))
        .count();
    (started, ended)
}

#[tokio::test(flavor = "current_thread")]
async fn auth_view_smoke_renders_login_form() {
    let mut harness = setup_signed_out_harness(ViewKind::Auth).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    for expected in [
        "MateLog",
        "Plataforma de Aprendizaje de Matemáticas",
        "Iniciar Sesión",
        "Registrarse",
        "Ingresa tu usuario",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert!(!html.contains("Confirmar Contraseña"), "register fields leaked into {html}");

    let calls = harness.backend.calls();
    assert!(calls.contains(&RecordedCall::FetchCsrf), "no csrf fetch in {calls:?}");
    assert!(
        calls.contains(&RecordedCall::StartActivity(
            ScreenKind::Login,
            ActivityContext::none()
        )),
        "login screen not tracked: {calls:?}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn lessons_view_smoke_renders_cards_in_order() {
    let mut harness = setup_view_harness(ViewKind::Lessons).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Hola, estudiante"), "missing greeting in {html}");
    assert!(html.contains("Mis Lecciones"), "missing heading in {html}");
    let first = html.find("Fracciones").expect("first lesson");
    let second = html.find("Porcentajes").expect("second lesson");
    assert!(first < second, "lessons out of order in {html}");
    assert!(html.contains("Lección 2"), "missing lesson number in {html}");
    assert!(html.contains("🔒"), "second lesson should be locked in {html}");
    assert!(html.contains("width: 0%"), "missing progress bar in {html}");

    assert!(
        harness.backend.calls().contains(&RecordedCall::StartActivity(
            ScreenKind::LessonList,
            ActivityContext::none()
        )),
        "lesson list not tracked"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_detail_view_smoke_renders_topics() {
    let mut harness = setup_view_harness(ViewKind::LessonDetail(1)).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Temas de la Lección"), "missing heading in {html}");
    assert!(html.contains("Suma y resta de fracciones"), "missing description in {html}");
    assert!(html.contains("Tema 1"), "missing first topic in {html}");
    assert!(html.contains("Distinto denominador"), "missing second topic in {html}");
    assert!(html.contains("← Volver"), "missing back link in {html}");

    assert!(
        harness.backend.calls().contains(&RecordedCall::StartActivity(
            ScreenKind::LessonDetail,
            ActivityContext::lesson(LessonId::new(1))
        )),
        "lesson detail not tracked"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn locked_lesson_shows_message_and_way_back() {
    let backend = InMemoryBackend::demo();
    backend.lock_lesson(LessonId::new(2));
    let mut harness = setup_with_backend(ViewKind::LessonDetail(2), backend, true).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("Debes completar la lección anterior primero"),
        "missing locked message in {html}"
    );
    assert!(html.contains("Volver a Lecciones"), "missing way back in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn topic_view_smoke_starts_on_first_content_item() {
    let mut harness = setup_view_harness(ViewKind::Topic(11)).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Igual denominador"), "missing title in {html}");
    assert!(html.contains("Teoría"), "missing content badge in {html}");
    assert!(html.contains("<strong>a/c + b/c = (a+b)/c</strong>"), "markup not injected in {html}");
    assert!(html.contains("← Salir"), "missing exit in {html}");
    assert!(html.contains("Continuar"), "missing continue in {html}");
    assert!(html.contains("📝 Ir a Ejercicios"), "missing shortcut in {html}");
    assert!(html.contains("1 / 3"), "missing progress in {html}");
    assert!(!html.contains("← Volver"), "back shown on the first item in {html}");

    assert!(
        harness.backend.calls().contains(&RecordedCall::StartActivity(
            ScreenKind::TopicContent,
            ActivityContext::topic(TopicId::new(11))
        )),
        "topic content not tracked"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn locked_topic_is_not_opened() {
    let mut harness = setup_view_harness(ViewKind::Topic(12)).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("Debes completar el tema anterior primero"),
        "missing locked message in {html}"
    );
    assert!(html.contains("Volver a Lecciones"), "missing way back in {html}");
    assert!(!html.contains("Enviar Respuesta"), "exercises leaked into {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn leaving_a_view_closes_its_activity() {
    let mut harness = setup_view_harness(ViewKind::Lessons).await;
    harness.rebuild();
    harness.settle().await;
    assert_eq!(harness.backend.open_activities(), 1);

    harness.show(None);
    harness.settle().await;

    let (_, ended) = activity_calls(&harness.backend.calls());
    assert_eq!(ended, 1, "lesson list not closed");
    assert_eq!(harness.backend.open_activities(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn moving_to_another_topic_reopens_tracking() {
    let mut harness = setup_view_harness(ViewKind::Topic(11)).await;
    harness.rebuild();
    harness.settle().await;

    harness.show(Some(ViewKind::Topic(12)));
    harness.settle().await;

    let (started, ended) = activity_calls(&harness.backend.calls());
    assert_eq!(
        started.last(),
        Some(&(ScreenKind::TopicContent, ActivityContext::topic(TopicId::new(12)))),
        "new topic not tracked: {started:?}"
    );
    assert_eq!(ended, started.len() - 1, "previous topic left open: {started:?}");
    assert_eq!(harness.backend.open_activities(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn quick_screen_changes_close_every_opened_activity() {
    let mut harness = setup_view_harness(ViewKind::Tracked(ScreenKind::Login)).await;
    harness.rebuild();
    harness.settle().await;
    assert_eq!(harness.backend.open_activities(), 1);

    harness.set_screen(ScreenKind::Register);
    harness.drive();
    harness.set_screen(ScreenKind::LessonList);
    harness.settle().await;

    let (started, _) = activity_calls(&harness.backend.calls());
    assert_eq!(
        started.last(),
        Some(&(ScreenKind::LessonList, ActivityContext::none())),
        "last screen not tracked: {started:?}"
    );
    assert_eq!(harness.backend.open_activities(), 1, "stale activities: {started:?}");
}

#[tokio::test(flavor = "current_thread")]
async fn unmounting_during_a_screen_change_closes_everything() {
    let mut harness = setup_view_harness(ViewKind::Tracked(ScreenKind::Login)).await;
    harness.rebuild();
    harness.settle().await;

    harness.set_screen(ScreenKind::Register);
    harness.drive();
    harness.show(None);
    harness.settle().await;

    let (started, ended) = activity_calls(&harness.backend.calls());
    assert!(ended >= 1, "login screen never closed: {started:?}");
    assert_eq!(harness.backend.open_activities(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn topic_change_drops_the_previous_notice() {
    let mut harness = setup_view_harness(ViewKind::TopicState(11)).await;
    harness.rebuild();
    harness.settle().await;

    let state = harness.handles.topic_state();
    harness.in_runtime(|| {
        let mut notice = state.notice;
        let mut busy = state.busy;
        notice.set(Some("Error al validar la respuesta".into()));
        busy.set(true);
    });
    harness.settle().await;
    assert!(harness.render().contains("Error al validar la respuesta"));

    harness.set_topic(11);
    harness.settle().await;
    assert!(
        harness.in_runtime(|| state.notice.peek().is_some()),
        "same topic must keep its notice"
    );

    harness.set_topic(12);
    harness.settle().await;
    harness.in_runtime(|| {
        assert!(state.notice.peek().is_none(), "notice carried over");
        assert!(state.dialog.peek().is_none());
        assert!(!*state.busy.peek(), "busy carried over");
    });
    assert!(!harness.render().contains("Error al validar la respuesta"));
}

#[tokio::test(flavor = "current_thread")]
async fn topic_without_exercises_offers_a_way_back() {
    let mut harness = setup_exercise_harness(11, |content| content.exercises.clear()).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("No hay ejercicios disponibles"), "missing empty state in {html}");
    assert!(html.contains("← Volver al Tema"), "no way back in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn empty_topic_offers_an_exit() {
    let mut harness = setup_exercise_harness(11, |content| {
        content.contents.clear();
        content.exercises.clear();
    })
    .await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("No hay ejercicios disponibles"), "missing empty state in {html}");
    assert!(html.contains("← Salir"), "no exit in {html}");
    assert!(!html.contains("← Volver al Tema"), "nothing to return to in {html}");
}
