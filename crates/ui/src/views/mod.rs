mod auth;
mod common;
mod lesson_detail;
mod lessons;
mod state;
mod topic;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use auth::AuthView;
pub use common::{FieldError, Markup, Notice, ViewErrorBox};
pub use lesson_detail::LessonDetailView;
pub use lessons::LessonsView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use topic::TopicView;
