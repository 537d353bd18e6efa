use api::ApiError;
use dioxus::prelude::*;
use services::{LessonError, TopicFlowError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    Network,
    /// The cookie session is gone; the view signs the student out.
    SessionExpired,
    LessonLocked,
    TopicLocked,
    NotFound,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Unknown => "Ocurrió un error. Intenta de nuevo.",
            Self::Network => "Error de conexión. Verifica tu conexión.",
            Self::SessionExpired => "Tu sesión expiró. Inicia sesión de nuevo.",
            Self::LessonLocked => "Debes completar la lección anterior primero",
            Self::TopicLocked => "Debes completar el tema anterior primero",
            Self::NotFound => "No se encontró el contenido solicitado.",
        }
    }
}

impl From<ApiError> for ViewError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(_) => Self::Network,
            ApiError::Unauthorized { .. } => Self::SessionExpired,
            ApiError::NotFound => Self::NotFound,
            _ => Self::Unknown,
        }
    }
}

impl From<LessonError> for ViewError {
    fn from(err: LessonError) -> Self {
        match err {
            LessonError::Locked => Self::LessonLocked,
            LessonError::NotFound => Self::NotFound,
            LessonError::SessionExpired => Self::SessionExpired,
            LessonError::Api(err) => err.into(),
            _ => Self::Unknown,
        }
    }
}

impl From<TopicFlowError> for ViewError {
    fn from(err: TopicFlowError) -> Self {
        match err {
            TopicFlowError::Locked => Self::TopicLocked,
            TopicFlowError::NotFound => Self::NotFound,
            TopicFlowError::SessionExpired => Self::SessionExpired,
            TopicFlowError::Api(err) => err.into(),
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn backend_errors_map_to_view_errors() {
        assert_eq!(ViewError::from(LessonError::Locked), ViewError::LessonLocked);
        assert_eq!(ViewError::from(TopicFlowError::Locked), ViewError::TopicLocked);
        assert_eq!(
            ViewError::from(LessonError::Api(ApiError::Transport("refused".into()))),
            ViewError::Network
        );
        assert_eq!(
            ViewError::from(ApiError::Unauthorized { payload: Value::Null }),
            ViewError::SessionExpired
        );
        assert_eq!(
            ViewError::from(TopicFlowError::Api(ApiError::Decode("bad".into()))),
            ViewError::Unknown
        );
    }
}
