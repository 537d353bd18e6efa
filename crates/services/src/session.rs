use std::sync::{Arc, Mutex};

use api::{AuthGateway, TrackingGateway};
use matelog_core::model::{Credentials, Registration, StudySessionId, User};

use crate::best_effort::best_effort;
use crate::error::AuthFailure;

/// What the client knows about the signed-in student.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub study_session: Option<StudySessionId>,
}

/// Holder of the current user and the open study session.
///
/// Constructed once by the app and handed to the views; clones share state.
/// Every successful login or resume opens exactly one study session and
/// logout closes it.
#[derive(Clone)]
pub struct SessionContext {
    auth: Arc<dyn AuthGateway>,
    tracking: Arc<dyn TrackingGateway>,
    state: Arc<Mutex<SessionState>>,
}

impl SessionContext {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthGateway>, tracking: Arc<dyn TrackingGateway>) -> Self {
        Self {
            auth,
            tracking,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.snapshot().user
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.snapshot().user.is_some()
    }

    #[must_use]
    pub fn study_session(&self) -> Option<StudySessionId> {
        self.snapshot().study_session
    }

    /// Primes the CSRF cookie before the auth form is used. Best-effort.
    pub async fn prepare_auth(&self) {
        best_effort("auth.csrf", self.auth.fetch_csrf_token()).await;
    }

    /// Asks the backend for an existing cookie session.
    ///
    /// Returns the user when one exists; any failure means "signed out".
    pub async fn resume(&self) -> Option<User> {
        match self.auth.profile().await {
            Ok(user) => {
                tracing::info!(user = %user.username, "session resumed");
                self.sign_in(user.clone()).await;
                Some(user)
            }
            Err(error) => {
                tracing::debug!(error = %error, "no session to resume");
                self.clear();
                None
            }
        }
    }

    /// # Errors
    ///
    /// Returns `AuthFailure` carrying the backend's message or field errors.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthFailure> {
        let user = self.auth.login(credentials).await.map_err(|error| {
            tracing::info!(error = %error, "login refused");
            AuthFailure::from(error)
        })?;
        tracing::info!(user = %user.username, "logged in");
        self.sign_in(user.clone()).await;
        Ok(user)
    }

    /// Creates an account without signing in.
    ///
    /// # Errors
    ///
    /// Returns `AuthFailure` carrying the backend's message or field errors.
    pub async fn register(&self, registration: &Registration) -> Result<User, AuthFailure> {
        let user = self.auth.register(registration).await.map_err(|error| {
            tracing::info!(error = %error, "registration refused");
            AuthFailure::from(error)
        })?;
        tracing::info!(user = %user.username, "account registered");
        Ok(user)
    }

    /// Closes the study session and the cookie session, then forgets the user.
    ///
    /// Local state is cleared even when the backend calls fail.
    pub async fn logout(&self) {
        self.close_study_session().await;
        best_effort("auth.logout", self.auth.logout()).await;
        self.clear();
        tracing::info!("logged out");
    }

    /// Drops local state after the backend reported the session as gone.
    pub fn expire(&self) {
        if self.is_authenticated() {
            tracing::info!("session expired");
        }
        self.clear();
    }

    async fn sign_in(&self, user: User) {
        self.close_study_session().await;
        let study_session =
            best_effort("tracking.session_start", self.tracking.start_study_session()).await;
        if let Ok(mut guard) = self.state.lock() {
            *guard = SessionState {
                user: Some(user),
                study_session,
            };
        }
    }

    async fn close_study_session(&self) {
        let open = self
            .state
            .lock()
            .ok()
            .and_then(|mut guard| guard.study_session.take());
        if let Some(id) = open {
            best_effort(
                "tracking.session_end",
                self.tracking.end_study_session(id),
            )
            .await;
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.state.lock() {
            *guard = SessionState::default();
        }
    }
}
