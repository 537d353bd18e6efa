//! Shared error types for the services crate.

use std::collections::BTreeMap;

use api::{ApiError, ConfigError};
use matelog_core::flow::FlowError;
use serde_json::Value;
use thiserror::Error;

/// Why a login or registration was refused.
///
/// Backend wording is kept verbatim; only the transport case has no text of its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AuthFailure {
    /// The backend's `error` string, or a plain-text body.
    #[error("{0}")]
    Message(String),
    /// Field rejections keyed by backend field name (`username`, `password`, ...).
    #[error("rejected fields: {}", field_names(.0))]
    Fields(BTreeMap<String, Vec<String>>),
    #[error("authentication service unavailable")]
    Unavailable,
}

fn field_names(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields.keys().cloned().collect::<Vec<_>>().join(", ")
}

impl From<ApiError> for AuthFailure {
    fn from(err: ApiError) -> Self {
        if let Some(message) = err.backend_message() {
            return Self::Message(message.to_string());
        }
        match err.payload() {
            Some(Value::String(text)) if !text.trim().is_empty() => Self::Message(text.clone()),
            Some(Value::Object(map)) if !map.is_empty() => Self::Fields(
                map.iter()
                    .map(|(field, value)| (field.clone(), messages_of(value)))
                    .collect(),
            ),
            _ => Self::Unavailable,
        }
    }
}

fn messages_of(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => vec![text.clone()],
        Value::Array(items) => items.iter().flat_map(messages_of).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

/// Errors emitted by `LessonService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonError {
    #[error("the previous lesson has to be completed first")]
    Locked,
    #[error("lesson not found")]
    NotFound,
    #[error("session expired")]
    SessionExpired,
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for LessonError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Forbidden { .. } => Self::Locked,
            ApiError::NotFound => Self::NotFound,
            ApiError::Unauthorized { .. } => Self::SessionExpired,
            other => Self::Api(other),
        }
    }
}

/// Errors emitted by `TopicFlowService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TopicFlowError {
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error("topic is locked")]
    Locked,
    #[error("topic not found")]
    NotFound,
    #[error("session expired")]
    SessionExpired,
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for TopicFlowError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Forbidden { .. } => Self::Locked,
            ApiError::NotFound => Self::NotFound,
            ApiError::Unauthorized { .. } => Self::SessionExpired,
            other => Self::Api(other),
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_string_wins() {
        let failure = AuthFailure::from(ApiError::Unauthorized {
            payload: json!({"error": "Credenciales inválidas"}),
        });
        assert_eq!(failure, AuthFailure::Message("Credenciales inválidas".into()));
    }

    #[test]
    fn structured_payload_becomes_fields() {
        let failure = AuthFailure::from(ApiError::Rejected {
            status: 400,
            payload: json!({
                "username": ["Ya existe un usuario con este nombre."],
                "edad": "Valor inválido"
            }),
        });
        let AuthFailure::Fields(fields) = failure else {
            panic!("expected field errors");
        };
        assert_eq!(fields["username"], vec!["Ya existe un usuario con este nombre."]);
        assert_eq!(fields["edad"], vec!["Valor inválido"]);
    }

    #[test]
    fn transport_errors_have_no_backend_text() {
        assert_eq!(
            AuthFailure::from(ApiError::Transport("refused".into())),
            AuthFailure::Unavailable
        );
        assert_eq!(
            AuthFailure::from(ApiError::Rejected {
                status: 500,
                payload: json!("Server Error"),
            }),
            AuthFailure::Message("Server Error".into())
        );
    }

    #[test]
    fn forbidden_lesson_is_locked() {
        let err = LessonError::from(ApiError::Forbidden { payload: Value::Null });
        assert!(matches!(err, LessonError::Locked));
        let err = TopicFlowError::from(ApiError::Unauthorized { payload: Value::Null });
        assert!(matches!(err, TopicFlowError::SessionExpired));
    }
}
