//! Request/response bodies and the status mapping for the REST backend.

use matelog_core::model::{ActivityContext, ActivityId, ScreenKind, StudySessionId, User};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::ApiError;

pub(crate) const CSRF_COOKIE: &str = "csrftoken";
pub(crate) const CSRF_HEADER: &str = "X-CSRFToken";

/// Login and register wrap the user; older backends used `user` instead of `usuario`.
#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    #[serde(default)]
    usuario: Option<User>,
    #[serde(default)]
    user: Option<User>,
}

impl UserEnvelope {
    pub(crate) fn into_user(self) -> Result<User, ApiError> {
        self.usuario
            .or(self.user)
            .ok_or_else(|| ApiError::Decode("response carries no user".into()))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CsrfResponse {
    #[serde(rename = "csrfToken")]
    pub(crate) token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActivityStarted {
    pub(crate) actividad_id: ActivityId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionStarted {
    pub(crate) sesion_id: StudySessionId,
}

/// Body of `POST /tracking/iniciar/`.
///
/// The context goes out twice: flat for the documented contract and under
/// `metadata`, which is where the backend actually reads it.
#[derive(Debug, Serialize)]
pub(crate) struct StartActivity {
    tipo_pantalla: ScreenKind,
    #[serde(flatten)]
    context: ActivityContext,
    metadata: ActivityContext,
}

impl StartActivity {
    pub(crate) fn new(screen: ScreenKind, context: ActivityContext) -> Self {
        Self {
            tipo_pantalla: screen,
            context,
            metadata: context,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ActivityRef {
    pub(crate) actividad_id: ActivityId,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionRef {
    pub(crate) sesion_id: StudySessionId,
}

/// Maps a non-success status and its body to an `ApiError`.
pub(crate) fn classify(status: u16, body: &str) -> ApiError {
    let payload = parse_payload(body);
    match status {
        401 => ApiError::Unauthorized { payload },
        403 => ApiError::Forbidden { payload },
        404 => ApiError::NotFound,
        _ => ApiError::Rejected { status, payload },
    }
}

/// JSON bodies are kept as-is; anything else is wrapped as a string.
pub(crate) fn parse_payload(body: &str) -> Value {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let trimmed = body.trim();
    let text = if trimmed.is_empty() { "null" } else { trimmed };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Finds `csrftoken` in a `Cookie` header value (`a=1; csrftoken=xyz`).
pub(crate) fn csrf_from_cookie_header(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == CSRF_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}
