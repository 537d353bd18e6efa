use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use matelog_core::model::{
    ActivityContext, ActivityId, ActivityRecord, AnswerSubmission, Credentials, FinalizeOutcome,
    Lesson, LessonDetail, LessonId, Registration, ScreenKind, StudySessionId, TopicContent,
    TopicId, User, ValidationResult,
};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;
use url::Url;

use crate::config::ApiConfig;
use crate::gateway::{ApiError, AuthGateway, LessonGateway, TrackingGateway};

mod wire;

use wire::{
    ActivityRef, ActivityStarted, CSRF_HEADER, CsrfResponse, SessionRef, SessionStarted,
    StartActivity, UserEnvelope,
};

/// REST client for the MateLog backend.
///
/// Keeps the session cookie in its own jar and echoes the CSRF token on every
/// request, read from the `csrftoken` cookie or, failing that, from the last
/// `/users/csrf/` response.
pub struct HttpBackend {
    client: Client,
    jar: Arc<Jar>,
    config: ApiConfig,
    cookie_url: Option<Url>,
    csrf_token: Mutex<Option<String>>,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let cookie_url = Url::parse(config.base_url()).ok();
        Ok(Self {
            client,
            jar,
            config,
            cookie_url,
            csrf_token: Mutex::new(None),
        })
    }

    fn csrf_token(&self) -> Option<String> {
        let from_cookie = self
            .cookie_url
            .as_ref()
            .and_then(|url| self.jar.cookies(url))
            .and_then(|header| header.to_str().ok().and_then(wire::csrf_from_cookie_header));
        from_cookie.or_else(|| self.csrf_token.lock().ok().and_then(|guard| guard.clone()))
    }

    fn remember_csrf_token(&self, token: String) {
        if let Ok(mut guard) = self.csrf_token.lock() {
            *guard = Some(token);
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        let mut request = self.client.request(method.clone(), &url);
        if let Some(token) = self.csrf_token() {
            request = request.header(CSRF_HEADER, token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        tracing::debug!(%method, path, "backend request");
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(%method, path, status = status.as_u16(), "backend rejected request");
            return Err(wire::classify(status.as_u16(), &text));
        }
        wire::decode(&text)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(Method::POST, path, Some(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::POST, path, None).await
    }
}

#[async_trait]
impl AuthGateway for HttpBackend {
    async fn fetch_csrf_token(&self) -> Result<(), ApiError> {
        let response: CsrfResponse = self.get("users/csrf/").await?;
        self.remember_csrf_token(response.token);
        Ok(())
    }

    async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.post("users/register/", registration).await?;
        envelope.into_user()
    }

    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.post("users/login/", credentials).await?;
        envelope.into_user()
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let _: IgnoredAny = self.post_empty("users/logout/").await?;
        Ok(())
    }

    async fn profile(&self) -> Result<User, ApiError> {
        self.get("users/profile/").await
    }
}

#[async_trait]
impl LessonGateway for HttpBackend {
    async fn list_lessons(&self) -> Result<Vec<Lesson>, ApiError> {
        self.get("lessons/lecciones/").await
    }

    async fn lesson_detail(&self, id: LessonId) -> Result<LessonDetail, ApiError> {
        self.get(&format!("lessons/lecciones/{id}/")).await
    }

    async fn topic_content(&self, id: TopicId) -> Result<TopicContent, ApiError> {
        self.get(&format!("lessons/temas/{id}/")).await
    }

    async fn validate_answer(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<ValidationResult, ApiError> {
        self.post("lessons/ejercicios/validar/", submission).await
    }

    async fn finalize_topic(&self, id: TopicId) -> Result<FinalizeOutcome, ApiError> {
        self.post_empty(&format!("lessons/temas/{id}/finalizar/"))
            .await
    }

    async fn retry_topic(&self, id: TopicId) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .post_empty(&format!("lessons/temas/{id}/reintentar/"))
            .await?;
        Ok(())
    }

    async fn return_to_topic(&self, id: TopicId) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .post_empty(&format!("lessons/temas/{id}/volver/"))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TrackingGateway for HttpBackend {
    async fn start_activity(
        &self,
        screen: ScreenKind,
        context: ActivityContext,
    ) -> Result<ActivityId, ApiError> {
        let started: ActivityStarted = self
            .post("tracking/iniciar/", &StartActivity::new(screen, context))
            .await?;
        Ok(started.actividad_id)
    }

    async fn end_activity(&self, id: ActivityId) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .post("tracking/finalizar/", &ActivityRef { actividad_id: id })
            .await?;
        Ok(())
    }

    async fn start_study_session(&self) -> Result<StudySessionId, ApiError> {
        let started: SessionStarted = self.post_empty("tracking/sesion/iniciar/").await?;
        Ok(started.sesion_id)
    }

    async fn end_study_session(&self, id: StudySessionId) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .post("tracking/sesion/finalizar/", &SessionRef { sesion_id: id })
            .await?;
        Ok(())
    }

    async fn list_activities(&self) -> Result<Vec<ActivityRecord>, ApiError> {
        self.get("tracking/actividades/").await
    }

    async fn register_content_back(&self, id: ActivityId) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .post("tracking/volver-contenido/", &ActivityRef { actividad_id: id })
            .await?;
        Ok(())
    }
}
