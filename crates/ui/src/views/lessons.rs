use dioxus::prelude::*;
use dioxus_router::use_navigator;
use matelog_core::model::{ActivityContext, ScreenKind};

use crate::context::{AppContext, use_session_handle};
use crate::routes::Route;
use crate::tracking::use_screen_tracking;
use crate::views::common::{Notice, ViewErrorBox};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CardClick, LessonCardVm, map_lesson_cards};

#[derive(Clone, Debug, PartialEq)]
struct LessonsData {
    cards: Vec<LessonCardVm>,
}

#[component]
pub fn LessonsView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session_handle();
    let navigator = use_navigator();
    let lessons = ctx.lessons();
    let notice = use_signal(|| None::<String>);

    let _tracking = use_screen_tracking(ScreenKind::LessonList, ActivityContext::none());

    let resource = use_resource(move || {
        let lessons = lessons.clone();
        async move {
            let entries = lessons.list_lessons().await.map_err(ViewError::from)?;
            Ok(LessonsData {
                cards: map_lesson_cards(&entries),
            })
        }
    });
    let state = view_state_from_resource(&resource);

    let username = session.user().map(|user| user.username).unwrap_or_default();
    let logout = move |_| {
        let auth = ctx.session();
        spawn(async move {
            auth.logout().await;
            session.signed_out();
            navigator.replace(Route::Auth {});
        });
    };

    rsx! {
        div { class: "page lessons-page",
            header { class: "lessons-header",
                h1 { "MateLog" }
                div { class: "user-info",
                    span { "Hola, {username}" }
                    button { class: "btn btn-logout", r#type: "button", onclick: logout,
                        "Cerrar Sesión"
                    }
                }
            }

            Notice { message: notice }

            main { class: "lessons-main",
                h2 { "Mis Lecciones" }
                p { class: "subtitle",
                    "Selecciona una lección para comenzar. Debes completar las lecciones en orden."
                }

                match state {
                    ViewState::Idle | ViewState::Loading => rsx! {
                        p { class: "loading", "Cargando lecciones..." }
                    },
                    ViewState::Ready(data) => rsx! {
                        if data.cards.is_empty() {
                            p { class: "empty-state", "No hay lecciones disponibles en este momento." }
                        } else {
                            div { class: "lessons-grid",
                                for card in data.cards {
                                    LessonCard { key: "{card.id}", card, notice }
                                }
                            }
                        }
                    },
                    ViewState::Error(ViewError::SessionExpired) => rsx! {
                        ViewErrorBox { error: ViewError::SessionExpired }
                    },
                    ViewState::Error(_) => rsx! {
                        div { class: "error-message",
                            "Error al cargar las lecciones. Verifica tu conexión."
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn LessonCard(card: LessonCardVm, notice: Signal<Option<String>>) -> Element {
    let navigator = use_navigator();
    let mut notice = notice;
    let click = card.click();
    let class = if card.locked {
        "lesson-card locked"
    } else {
        "lesson-card"
    };

    rsx! {
        div {
            class: "{class}",
            onclick: move |_| match click.clone() {
                CardClick::Open(route) => {
                    navigator.push(route);
                }
                CardClick::Locked(message) => notice.set(Some(message.to_string())),
            },
            div { class: "lesson-header",
                span { class: "lesson-number", "{card.number_label}" }
                if card.locked {
                    span { class: "lock-icon", "🔒" }
                }
            }
            h3 { "{card.title}" }
            if !card.summary.is_empty() {
                p { class: "lesson-description", "{card.summary}" }
            }
            div { class: "progress-section",
                div { class: "progress-info",
                    span { "Progreso" }
                    span { "{card.percent}%" }
                }
                div { class: "progress-bar",
                    div { class: "progress-fill", style: "{card.progress_style()}" }
                }
            }
            if card.completed {
                div { class: "completed-badge", "✓ Completada" }
            }
        }
    }
}
