use dioxus::prelude::*;
use dioxus_router::use_navigator;
use matelog_core::flow::{TopicFlow, Transition};
use matelog_core::model::ActivityId;

use crate::context::AppContext;
use crate::views::common::Markup;
use crate::vm::ContentPaneVm;

#[component]
pub(super) fn ContentPane(flow: Signal<Option<TopicFlow>>, activity: Option<ActivityId>) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut flow = flow;

    let (vm, item) = {
        let guard = flow.read();
        let Some(current) = guard.as_ref() else {
            return rsx! {};
        };
        (
            ContentPaneVm::from_flow(current),
            current.current_content().cloned(),
        )
    };

    let mut step = move |apply: fn(&mut TopicFlow) -> Transition| {
        flow.with_mut(|state| {
            if let Some(current) = state.as_mut() {
                let transition = apply(current);
                tracing::debug!(?transition, "content navigation");
            }
        });
    };

    let back = move |_| {
        let transition = flow.with_mut(|state| state.as_mut().map(TopicFlow::go_back));
        if matches!(transition, Some(Transition::WentBack(_))) {
            let topics = ctx.topics();
            spawn(async move {
                topics.notify_content_back(activity).await;
            });
        }
    };

    rsx! {
        div { class: "topic-content",
            header { class: "topic-header",
                button {
                    class: "btn-back",
                    r#type: "button",
                    onclick: move |_| navigator.go_back(),
                    "← Salir"
                }
                h1 { "{vm.title}" }
            }

            if let Some(item) = item {
                div { class: "content-item",
                    span { class: "content-type-badge", "{item.display_kind()}" }
                    Markup { text: item.body.clone(), class: "content-body" }
                }
            }

            if let Some(info) = vm.answered_info.clone() {
                p { class: "answered-info", "{info}" }
            }

            div { class: "content-navigation",
                if vm.show_back {
                    button { class: "btn", r#type: "button", onclick: back, "← Volver" }
                }
                if vm.show_extra {
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| step(TopicFlow::show_extra_example),
                        "Ver Otro Ejemplo"
                    }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| step(TopicFlow::advance),
                    "{vm.primary_label}"
                }
                if vm.show_go_to_exercises {
                    button {
                        class: "btn btn-exercises",
                        r#type: "button",
                        onclick: move |_| step(TopicFlow::go_to_exercises),
                        "📝 Ir a Ejercicios"
                    }
                }
            }

            p { class: "content-progress", "{vm.progress}" }
        }
    }
}
