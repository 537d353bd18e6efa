//! Topic screen: content slides, then exercises, then the finalize dialog.
//!
//! The loaded `TopicFlow` lives in one signal shared by both panes. Backend
//! calls never hold it across an await; they read what they need, then write
//! the outcome back.

mod content;
mod exercises;

use dioxus::prelude::*;
use dioxus_router::use_navigator;
use matelog_core::flow::{Phase, TopicFlow};
use matelog_core::model::{ActivityContext, TopicId};
use services::TopicFlowError;

use crate::context::{AppContext, SessionHandle, use_session_handle};
use crate::routes::Route;
use crate::tracking::use_screen_tracking;
use crate::views::ViewError;
use crate::views::common::{Notice, ViewErrorBox};
use crate::vm::{FinalizeAction, FinalizeDialog, RETRY_ERROR_NOTICE, screen_for_phase};

use content::ContentPane;
pub(crate) use exercises::ExercisePane;

/// Signals shared by the panes of one topic screen.
#[derive(Clone, Copy)]
pub(crate) struct TopicScreenState {
    pub flow: Signal<Option<TopicFlow>>,
    pub notice: Signal<Option<String>>,
    pub busy: Signal<bool>,
    pub dialog: Signal<Option<FinalizeDialog>>,
}

/// The instance survives a move to another topic, so the previous topic's
/// notice and dialog are dropped whenever `id` changes.
pub(crate) fn use_topic_screen_state(id: u64) -> TopicScreenState {
    let state = TopicScreenState {
        flow: use_signal(|| None::<TopicFlow>),
        notice: use_signal(|| None::<String>),
        busy: use_signal(|| false),
        dialog: use_signal(|| None::<FinalizeDialog>),
    };

    use_effect(use_reactive!(|(id,)| {
        let TopicScreenState {
            mut notice,
            mut busy,
            mut dialog,
            ..
        } = state;
        tracing::debug!(topic = id, "topic screen reset");
        notice.set(None);
        dialog.set(None);
        busy.set(false);
    }));

    state
}

#[component]
pub fn TopicView(id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let topic_id = TopicId::new(id);

    let TopicScreenState {
        mut flow,
        notice,
        busy,
        dialog,
    } = use_topic_screen_state(id);

    let resource = use_resource(use_reactive!(|(id,)| {
        let topics = ctx.topics();
        async move {
            topics
                .load(TopicId::new(id))
                .await
                .map_err(ViewError::from)
        }
    }));

    use_effect(move || {
        if let Some(Ok(loaded)) = &*resource.read() {
            flow.set(Some(loaded.clone()));
        }
    });

    let phase = flow
        .read()
        .as_ref()
        .filter(|current| current.topic_id() == topic_id)
        .map_or(Phase::Content, TopicFlow::phase);
    let tracking = use_screen_tracking(screen_for_phase(phase), ActivityContext::topic(topic_id));

    let loaded = flow
        .read()
        .as_ref()
        .is_some_and(|current| current.topic_id() == topic_id);
    let load_error = match &*resource.read() {
        Some(Err(error)) => Some(*error),
        _ => None,
    };

    if let Some(error) = load_error.filter(|_| !loaded) {
        return rsx! {
            div { class: "page topic-page",
                div { class: "error-container",
                    if error == ViewError::TopicLocked || error == ViewError::SessionExpired {
                        ViewErrorBox { error }
                    } else {
                        div { class: "error-message", "Error al cargar el tema" }
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
            }
        };
    }

    if !loaded {
        return rsx! {
            div { class: "page topic-page",
                p { class: "loading", "Cargando..." }
            }
        };
    }

    rsx! {
        div { class: "page topic-page",
            Notice { message: notice }
            match phase {
                Phase::Content => rsx! {
                    ContentPane { flow, activity: tracking.activity_id() }
                },
                Phase::Exercises => rsx! {
                    ExercisePane { flow, busy, notice, dialog }
                },
            }
            FinalizeModal { flow, busy, notice, dialog }
        }
    }
}

/// Reports a failed backend call: an expired session signs out, anything else
/// becomes a notice.
pub(crate) fn report_failure(
    ctx: &AppContext,
    session: SessionHandle,
    mut notice: Signal<Option<String>>,
    error: TopicFlowError,
    fallback: &'static str,
) {
    tracing::warn!(error = %error, "topic request failed");
    match ViewError::from(error) {
        ViewError::SessionExpired => {
            ctx.session().expire();
            session.signed_out();
        }
        _ => notice.set(Some(fallback.to_string())),
    }
}

#[component]
fn FinalizeModal(
    flow: Signal<Option<TopicFlow>>,
    busy: Signal<bool>,
    notice: Signal<Option<String>>,
    dialog: Signal<Option<FinalizeDialog>>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session_handle();
    let navigator = use_navigator();
    let mut flow = flow;
    let mut busy = busy;
    let mut dialog = dialog;

    let run = use_callback(move |action: FinalizeAction| {
        dialog.set(None);
        match action {
            FinalizeAction::Navigate(route) => {
                navigator.push(route);
            }
            FinalizeAction::Retry => {
                let Some(mut working) = flow.read().clone() else {
                    return;
                };
                busy.set(true);
                let ctx = ctx.clone();
                spawn(async move {
                    match ctx.topics().retry(&mut working).await {
                        Ok(()) => flow.set(Some(working)),
                        Err(error) => {
                            report_failure(&ctx, session, notice, error, RETRY_ERROR_NOTICE);
                        }
                    }
                    busy.set(false);
                });
            }
        }
    });

    let Some(current) = dialog.read().clone() else {
        return rsx! {};
    };
    let accept = current.accept.clone();
    let decline = current.decline.clone();
    let title = if current.passed {
        "¡Tema completado!"
    } else {
        "Tema no aprobado"
    };

    rsx! {
        div { class: "modal-overlay",
            div {
                class: "modal",
                onclick: move |evt| evt.stop_propagation(),
                h3 { class: "modal-title", "{title}" }
                div { class: "modal-body",
                    for line in current.message_lines() {
                        if line.is_empty() {
                            br {}
                        } else {
                            p { "{line}" }
                        }
                    }
                }
                div { class: "modal-actions",
                    if let Some((label, action)) = decline {
                        button {
                            class: "btn",
                            r#type: "button",
                            onclick: move |_| run.call(action.clone()),
                            "{label}"
                        }
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| run.call(accept.clone()),
                        "{current.accept_label}"
                    }
                }
            }
        }
    }
}
