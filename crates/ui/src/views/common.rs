use dioxus::prelude::*;
use matelog_core::RichText;

use crate::context::{AppContext, use_session_handle};
use crate::views::ViewError;
use crate::vm::render_markup;

/// Backend rich text, injected as HTML under the app's markup policy.
#[component]
pub fn Markup(text: RichText, class: String) -> Element {
    let ctx = use_context::<AppContext>();
    if text.is_blank() {
        return rsx! {};
    }
    let html = render_markup(&text, ctx.markup());
    rsx! {
        div { class: "{class}", dangerous_inner_html: "{html}" }
    }
}

/// Error banner for a failed load. An expired session also signs the student out.
#[component]
pub fn ViewErrorBox(error: ViewError) -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session_handle();

    use_effect(use_reactive!(|(error,)| {
        if error == ViewError::SessionExpired {
            tracing::info!("session expired, signing out");
            ctx.session().expire();
            session.signed_out();
        }
    }));

    rsx! {
        div { class: "error-message", "{error.message()}" }
    }
}

#[component]
pub fn FieldError(message: Option<String>) -> Element {
    match message {
        Some(message) => rsx! { span { class: "field-error", "{message}" } },
        None => rsx! {},
    }
}

/// Dismissible one-line notice, e.g. a locked card or an empty answer.
#[component]
pub fn Notice(message: Signal<Option<String>>) -> Element {
    let mut message = message;
    let Some(text) = message.read().clone() else {
        return rsx! {};
    };
    rsx! {
        div { class: "notice",
            span { "{text}" }
            button {
                class: "notice-close",
                r#type: "button",
                onclick: move |_| message.set(None),
                "×"
            }
        }
    }
}
