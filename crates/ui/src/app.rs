use dioxus::prelude::*;
use dioxus_router::Router;

use crate::context::{AppContext, SessionHandle, SessionStatus};
use crate::routes::Route;

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context_provider(|| SessionHandle::new(SessionStatus::Checking));

    // Restore a cookie session before the route guard decides.
    use_future(move || {
        let auth = ctx.session();
        async move {
            match auth.resume().await {
                Some(user) => session.signed_in(user),
                None => session.signed_out(),
            }
        }
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "MateLog" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Algo salió mal" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
