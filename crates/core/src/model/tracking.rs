use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ActivityId, ExerciseId, LessonId, TopicId};

/// Screen tag attached to every tracked activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenKind {
    #[serde(rename = "LOGIN")]
    Login,
    #[serde(rename = "REGISTRO")]
    Register,
    #[serde(rename = "LISTA_LECCIONES")]
    LessonList,
    #[serde(rename = "DETALLE_LECCION")]
    LessonDetail,
    #[serde(rename = "CONTENIDO_TEMA")]
    TopicContent,
    #[serde(rename = "EJERCICIOS")]
    Exercises,
    #[serde(rename = "OTRA", other)]
    Other,
}

impl ScreenKind {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Register => "REGISTRO",
            Self::LessonList => "LISTA_LECCIONES",
            Self::LessonDetail => "DETALLE_LECCION",
            Self::TopicContent => "CONTENIDO_TEMA",
            Self::Exercises => "EJERCICIOS",
            Self::Other => "OTRA",
        }
    }
}

/// Optional lesson/topic/exercise the tracked screen is about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityContext {
    #[serde(rename = "leccion_id", skip_serializing_if = "Option::is_none", default)]
    pub lesson_id: Option<LessonId>,
    #[serde(rename = "tema_id", skip_serializing_if = "Option::is_none", default)]
    pub topic_id: Option<TopicId>,
    #[serde(rename = "ejercicio_id", skip_serializing_if = "Option::is_none", default)]
    pub exercise_id: Option<ExerciseId>,
}

impl ActivityContext {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lesson(id: LessonId) -> Self {
        Self {
            lesson_id: Some(id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn topic(id: TopicId) -> Self {
        Self {
            topic_id: Some(id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_exercise(self, id: ExerciseId) -> Self {
        Self {
            exercise_id: Some(id),
            ..self
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lesson_id.is_none() && self.topic_id.is_none() && self.exercise_id.is_none()
    }
}

/// A past screen visit as listed by `GET /tracking/actividades/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: ActivityId,
    #[serde(rename = "tipo_pantalla")]
    pub screen: ScreenKind,
    #[serde(rename = "leccion", default)]
    pub lesson_id: Option<LessonId>,
    #[serde(rename = "tema", default)]
    pub topic_id: Option<TopicId>,
    #[serde(rename = "ejercicio", default)]
    pub exercise_id: Option<ExerciseId>,
    #[serde(rename = "timestamp_entrada", alias = "tiempo_inicio", default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "tiempo_segundos", default)]
    pub seconds: u64,
    #[serde(rename = "veces_volver_contenido", default)]
    pub back_navigations: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_serializes_to_empty_object() {
        let json = serde_json::to_value(ActivityContext::none()).unwrap();
        assert_eq!(json, serde_json::json!({}));
        assert!(ActivityContext::none().is_empty());
    }

    #[test]
    fn topic_context_with_exercise() {
        let context = ActivityContext::topic(TopicId::new(3)).with_exercise(ExerciseId::new(8));
        let json = serde_json::to_value(context).unwrap();
        assert_eq!(json, serde_json::json!({"tema_id": 3, "ejercicio_id": 8}));
    }

    #[test]
    fn unknown_screen_kind_maps_to_other() {
        let record: ActivityRecord = serde_json::from_str(
            r#"{"id": 1, "tipo_pantalla": "PERFIL", "tiempo_segundos": 30,
                "timestamp_entrada": "2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(record.screen, ScreenKind::Other);
        assert_eq!(record.seconds, 30);
        assert!(record.started_at.is_some());
    }
}
