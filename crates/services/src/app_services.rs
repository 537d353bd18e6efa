use std::sync::Arc;

use api::{ApiConfig, Backend, HttpBackend, InMemoryBackend};

use crate::Clock;
use crate::error::AppServicesError;
use crate::lessons::LessonService;
use crate::session::SessionContext;
use crate::topic_flow::TopicFlowService;
use crate::tracking::ScreenTracker;

/// Assembles the app-facing services over one backend.
#[derive(Clone)]
pub struct AppServices {
    session: SessionContext,
    lessons: Arc<LessonService>,
    topics: Arc<TopicFlowService>,
    tracker: Arc<ScreenTracker>,
}

impl AppServices {
    #[must_use]
    pub fn new(backend: Backend, clock: Clock) -> Self {
        let tracker = ScreenTracker::new(clock, Arc::clone(&backend.tracking));
        let session = SessionContext::new(
            Arc::clone(&backend.auth),
            Arc::clone(&backend.tracking),
        );
        let lessons = Arc::new(LessonService::new(Arc::clone(&backend.lessons)));
        let topics = Arc::new(TopicFlowService::new(
            clock,
            Arc::clone(&backend.lessons),
            tracker.clone(),
        ));

        Self {
            session,
            lessons,
            topics,
            tracker: Arc::new(tracker),
        }
    }

    /// Build services that talk to the REST backend at `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Api` if the HTTP client cannot be built.
    pub fn http(config: ApiConfig, clock: Clock) -> Result<Self, AppServicesError> {
        tracing::info!(api = config.base_url(), "using REST backend");
        let backend = HttpBackend::new(config)?;
        Ok(Self::new(Backend::from_shared(Arc::new(backend)), clock))
    }

    /// Build services from `MATELOG_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Config` for invalid variables.
    pub fn from_env(clock: Clock) -> Result<Self, AppServicesError> {
        Self::http(ApiConfig::from_env()?, clock)
    }

    /// Build services over the seeded in-memory backend.
    #[must_use]
    pub fn demo(clock: Clock) -> Self {
        tracing::info!("using in-memory demo backend");
        Self::new(
            Backend::from_shared(Arc::new(InMemoryBackend::demo())),
            clock,
        )
    }

    #[must_use]
    pub fn session(&self) -> SessionContext {
        self.session.clone()
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        Arc::clone(&self.lessons)
    }

    #[must_use]
    pub fn topics(&self) -> Arc<TopicFlowService> {
        Arc::clone(&self.topics)
    }

    #[must_use]
    pub fn tracker(&self) -> Arc<ScreenTracker> {
        Arc::clone(&self.tracker)
    }
}
