use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable, use_navigator};

use crate::context::{SessionStatus, use_session_handle};
use crate::views::{AuthView, LessonDetailView, LessonsView, TopicView};

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/", AuthView)] Auth {},
    #[layout(RequireSession)]
        #[route("/lecciones", LessonsView)] Lessons {},
        #[route("/leccion/:id", LessonDetailView)] LessonDetail { id: u64 },
        #[route("/tema/:id", TopicView)] Topic { id: u64 },
    #[end_layout]
    #[route("/:..segments", NotFound)] NotFound { segments: Vec<String> },
}

/// Layout guard: signed-out visitors are sent to the auth page.
#[component]
fn RequireSession() -> Element {
    let session = use_session_handle();
    let navigator = use_navigator();

    use_effect(move || {
        if session.status() == SessionStatus::SignedOut {
            tracing::debug!("no session, redirecting to auth");
            navigator.replace(Route::Auth {});
        }
    });

    match session.status() {
        SessionStatus::Checking => rsx! {
            div { class: "page", p { class: "loading", "Cargando..." } }
        },
        SessionStatus::SignedOut => rsx! {},
        SessionStatus::SignedIn(_) => rsx! { Outlet::<Route> {} },
    }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let navigator = use_navigator();
    let path = segments.join("/");
    use_effect(move || {
        tracing::debug!(%path, "unknown route, redirecting to auth");
        navigator.replace(Route::Auth {});
    });
    rsx! {}
}
