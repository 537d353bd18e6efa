use std::sync::Arc;

use dioxus::prelude::*;
use matelog_core::model::User;
use services::{AppServices, LessonService, ScreenTracker, SessionContext, TopicFlowService};

/// How rich-text fields from the backend reach the DOM.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MarkupPolicy {
    /// Injected as-is; the backend is the trust boundary.
    #[default]
    Trusted,
    /// Passed through ammonia first.
    Sanitized,
}

/// Services handed to every view. Provided by the composition root (`crates/app`).
#[derive(Clone)]
pub struct AppContext {
    services: AppServices,
    markup: MarkupPolicy,
}

impl AppContext {
    #[must_use]
    pub fn new(services: AppServices, markup: MarkupPolicy) -> Self {
        Self { services, markup }
    }

    #[must_use]
    pub fn session(&self) -> SessionContext {
        self.services.session()
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        self.services.lessons()
    }

    #[must_use]
    pub fn topics(&self) -> Arc<TopicFlowService> {
        self.services.topics()
    }

    #[must_use]
    pub fn tracker(&self) -> Arc<ScreenTracker> {
        self.services.tracker()
    }

    #[must_use]
    pub fn markup(&self) -> MarkupPolicy {
        self.markup
    }
}

#[must_use]
pub fn build_app_context(services: AppServices, markup: MarkupPolicy) -> AppContext {
    AppContext::new(services, markup)
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionStatus {
    /// The startup profile check has not answered yet.
    Checking,
    SignedIn(User),
    SignedOut,
}

/// Reactive mirror of `SessionContext` for the route guard and the header.
#[derive(Clone, Copy, PartialEq)]
pub struct SessionHandle {
    status: Signal<SessionStatus>,
}

impl SessionHandle {
    /// Must be called inside a component scope.
    #[must_use]
    pub fn new(initial: SessionStatus) -> Self {
        Self {
            status: Signal::new(initial),
        }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status.read().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        match &*self.status.read() {
            SessionStatus::SignedIn(user) => Some(user.clone()),
            _ => None,
        }
    }

    pub fn signed_in(mut self, user: User) {
        self.status.set(SessionStatus::SignedIn(user));
    }

    pub fn signed_out(mut self) {
        self.status.set(SessionStatus::SignedOut);
    }
}

#[must_use]
pub fn use_session_handle() -> SessionHandle {
    use_context::<SessionHandle>()
}
