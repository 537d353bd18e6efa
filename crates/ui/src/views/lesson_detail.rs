use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use matelog_core::RichText;
use matelog_core::model::{ActivityContext, LessonId, ScreenKind};

use crate::context::AppContext;
use crate::routes::Route;
use crate::tracking::use_screen_tracking;
use crate::views::common::{Markup, Notice, ViewErrorBox};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CardClick, TopicCardVm, map_topic_cards};

#[derive(Clone, Debug, PartialEq)]
struct LessonDetailData {
    number_label: String,
    title: String,
    description: RichText,
    topics: Vec<TopicCardVm>,
}

#[component]
pub fn LessonDetailView(id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let lesson_id = LessonId::new(id);
    let notice = use_signal(|| None::<String>);

    let _tracking = use_screen_tracking(ScreenKind::LessonDetail, ActivityContext::lesson(lesson_id));

    let resource = use_resource(use_reactive!(|(id,)| {
        let lessons = ctx.lessons();
        async move {
            let overview = lessons
                .lesson_detail(LessonId::new(id))
                .await
                .map_err(ViewError::from)?;
            Ok(LessonDetailData {
                number_label: format!("Lección {}", overview.detail.position),
                title: overview.detail.title.clone(),
                description: overview.detail.description.clone(),
                topics: map_topic_cards(&overview.topics),
            })
        }
    }));
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page lesson-detail-page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "loading", "Cargando..." }
                },
                ViewState::Error(error) => rsx! {
                    div { class: "error-container",
                        if error == ViewError::LessonLocked || error == ViewError::SessionExpired {
                            ViewErrorBox { error }
                        } else {
                            div { class: "error-message", "Error al cargar la lección" }
                        }
                        button {
                            class: "btn",
                            r#type: "button",
                            onclick: move |_| {
                                navigator.push(Route::Lessons {});
                            },
                            "Volver a Lecciones"
                        }
                    }
                },
                ViewState::Ready(data) => rsx! {
                    header { class: "lesson-detail-header",
                        Link { class: "btn-back", to: Route::Lessons {}, "← Volver" }
                        div { class: "lesson-info",
                            span { class: "lesson-number", "{data.number_label}" }
                            h1 { "{data.title}" }
                            Markup { text: data.description.clone(), class: "lesson-description" }
                        }
                    }

                    Notice { message: notice }

                    main { class: "topics-section",
                        h2 { "Temas de la Lección" }
                        if data.topics.is_empty() {
                            p { class: "empty-state", "No hay temas disponibles en esta lección" }
                        } else {
                            div { class: "topics-list",
                                for card in data.topics {
                                    TopicCard { key: "{card.id}", card, notice }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn TopicCard(card: TopicCardVm, notice: Signal<Option<String>>) -> Element {
    let navigator = use_navigator();
    let mut notice = notice;
    let click = card.click();
    let class = if card.locked {
        format!("topic-card locked {}", card.status_class)
    } else {
        format!("topic-card {}", card.status_class)
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
            div { class: "topic-header",
                span { class: "topic-number", "{card.number_label}" }
                if card.locked {
                    span { class: "lock-icon", "🔒" }
                }
            }
            h3 { "{card.title}" }
            Markup { text: card.description.clone(), class: "topic-description" }
            div { class: "topic-status",
                span { class: "status-label", "{card.status_label}" }
                if let Some(score) = card.score_label.clone() {
                    span { class: "topic-score",
                        "{score}"
                        if let Some(attempts) = card.attempts_label.clone() {
                            " {attempts}"
                        }
                    }
                }
            }
        }
    }
}
