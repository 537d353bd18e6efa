use std::sync::Arc;

use async_trait::async_trait;
use matelog_core::model::{
    ActivityContext, ActivityId, ActivityRecord, AnswerSubmission, Credentials, FinalizeOutcome,
    Lesson, LessonDetail, LessonId, Registration, ScreenKind, StudySessionId, TopicContent,
    TopicId, User, ValidationResult,
};
use serde_json::Value;
use thiserror::Error;

use crate::memory::InMemoryBackend;

/// Errors surfaced by backend gateways.
///
/// Rejections keep the decoded JSON body so callers can show the backend's
/// own message or field errors without rewording them.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not authenticated")]
    Unauthorized { payload: Value },

    #[error("forbidden")]
    Forbidden { payload: Value },

    #[error("not found")]
    NotFound,

    #[error("request rejected with status {status}")]
    Rejected { status: u16, payload: Value },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Unauthorized { payload }
            | Self::Forbidden { payload }
            | Self::Rejected { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// The `error` string of a rejection body, when the backend sent one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        self.payload()
            .and_then(|payload| payload.get("error"))
            .and_then(Value::as_str)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// `/users/*` endpoints.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Primes the CSRF cookie (`GET /users/csrf/`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn fetch_csrf_token(&self) -> Result<(), ApiError>;

    /// Creates an account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the field errors on invalid input.
    async fn register(&self, registration: &Registration) -> Result<User, ApiError>;

    /// Opens a cookie session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for wrong credentials.
    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn logout(&self) -> Result<(), ApiError>;

    /// The user behind the current cookie session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when there is no session.
    async fn profile(&self) -> Result<User, ApiError>;
}

/// `/lessons/*` endpoints.
#[async_trait]
pub trait LessonGateway: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body cannot be decoded.
    async fn list_lessons(&self) -> Result<Vec<Lesson>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` for a lesson the user may not open yet.
    async fn lesson_detail(&self, id: LessonId) -> Result<LessonDetail, ApiError>;

    /// Slides, exercises and any answers from the current attempt.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` for a locked topic and `ApiError::NotFound`
    /// for an unknown one.
    async fn topic_content(&self, id: TopicId) -> Result<TopicContent, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn validate_answer(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<ValidationResult, ApiError>;

    /// Asks the backend for the pass/fail decision of the current attempt.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn finalize_topic(&self, id: TopicId) -> Result<FinalizeOutcome, ApiError>;

    /// Clears the stored answers of the current attempt.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn retry_topic(&self, id: TopicId) -> Result<(), ApiError>;

    /// Records that the student went from the exercises back to the content.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn return_to_topic(&self, id: TopicId) -> Result<(), ApiError>;
}

/// `/tracking/*` endpoints.
#[async_trait]
pub trait TrackingGateway: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn start_activity(
        &self,
        screen: ScreenKind,
        context: ActivityContext,
    ) -> Result<ActivityId, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn end_activity(&self, id: ActivityId) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn start_study_session(&self) -> Result<StudySessionId, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn end_study_session(&self, id: StudySessionId) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn list_activities(&self) -> Result<Vec<ActivityRecord>, ApiError>;

    /// Counts a "back" click on a content screen.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn register_content_back(&self, id: ActivityId) -> Result<(), ApiError>;
}

/// The three gateways the services need, usually backed by one client.
#[derive(Clone)]
pub struct Backend {
    pub auth: Arc<dyn AuthGateway>,
    pub lessons: Arc<dyn LessonGateway>,
    pub tracking: Arc<dyn TrackingGateway>,
}

impl Backend {
    /// Uses one implementation for every gateway.
    #[must_use]
    pub fn from_shared<T>(backend: Arc<T>) -> Self
    where
        T: AuthGateway + LessonGateway + TrackingGateway + 'static,
    {
        let auth: Arc<dyn AuthGateway> = backend.clone();
        let lessons: Arc<dyn LessonGateway> = backend.clone();
        let tracking: Arc<dyn TrackingGateway> = backend;
        Self {
            auth,
            lessons,
            tracking,
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_shared(Arc::new(InMemoryBackend::new()))
    }
}
