pub mod app;
pub mod context;
pub mod routes;
pub mod tracking;
pub mod views;
pub mod vm;

pub use app::App;
pub use context::{
    AppContext, MarkupPolicy, SessionHandle, SessionStatus, build_app_context, use_session_handle,
};
pub use routes::Route;
