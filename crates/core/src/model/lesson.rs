use serde::{Deserialize, Serialize};

use crate::markup::RichText;
use crate::model::{LessonId, TopicId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LessonStatus {
    #[default]
    #[serde(rename = "SIN_INICIAR")]
    NotStarted,
    #[serde(rename = "EN_PROGRESO")]
    InProgress,
    #[serde(rename = "COMPLETADA")]
    Completed,
}

/// Per-user progress embedded in each lesson.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonProgress {
    #[serde(rename = "estado", default)]
    pub status: LessonStatus,
    #[serde(rename = "porcentaje_completado", default)]
    pub percent_complete: f64,
    /// Explicit completion flag; some backend versions only send `estado`.
    #[serde(rename = "completada", default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl LessonProgress {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
            .unwrap_or(self.status == LessonStatus::Completed)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    #[serde(rename = "orden")]
    pub position: u32,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default)]
    pub description: RichText,
    #[serde(rename = "cantidad_temas", default)]
    pub topic_count: Option<u32>,
    #[serde(rename = "progreso", default)]
    pub progress: LessonProgress,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopicStatus {
    #[default]
    #[serde(rename = "SIN_INICIAR")]
    NotStarted,
    #[serde(rename = "INICIADO")]
    InProgress,
    #[serde(rename = "COMPLETADO")]
    Completed,
}

impl TopicStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Sin iniciar",
            Self::InProgress => "En progreso",
            Self::Completed => "Completado",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicProgress {
    #[serde(rename = "estado", default)]
    pub status: TopicStatus,
    #[serde(rename = "desbloqueado", default)]
    pub unlocked: bool,
    #[serde(rename = "porcentaje_acierto", default)]
    pub accuracy: f64,
    #[serde(rename = "intentos_realizados", default)]
    pub attempts: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub id: TopicId,
    #[serde(rename = "orden")]
    pub position: u32,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default)]
    pub description: RichText,
    #[serde(rename = "cantidad_contenidos", default)]
    pub content_count: Option<u32>,
    #[serde(rename = "cantidad_ejercicios", default)]
    pub exercise_count: Option<u32>,
    #[serde(rename = "progreso", default)]
    pub progress: Option<TopicProgress>,
}

impl TopicSummary {
    #[must_use]
    pub fn status(&self) -> TopicStatus {
        self.progress
            .as_ref()
            .map_or(TopicStatus::NotStarted, |progress| progress.status)
    }
}

/// A lesson with its topics, as returned by the lesson detail endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LessonDetail {
    pub id: LessonId,
    #[serde(rename = "orden")]
    pub position: u32,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default)]
    pub description: RichText,
    #[serde(rename = "temas", default)]
    pub topics: Vec<TopicSummary>,
    #[serde(rename = "progreso", default)]
    pub progress: LessonProgress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_falls_back_to_status() {
        let progress: LessonProgress =
            serde_json::from_str(r#"{"estado": "COMPLETADA", "porcentaje_completado": 100.0}"#)
                .unwrap();
        assert!(progress.is_completed());

        let progress: LessonProgress = serde_json::from_str(
            r#"{"estado": "COMPLETADA", "porcentaje_completado": 100.0, "completada": false}"#,
        )
        .unwrap();
        assert!(!progress.is_completed());
    }

    #[test]
    fn lesson_detail_parses_topics_with_progress() {
        let detail: LessonDetail = serde_json::from_str(
            r#"{
                "id": 1, "orden": 1, "titulo": "Fracciones", "descripcion": "<p>Intro</p>",
                "temas": [
                    {"id": 10, "orden": 1, "titulo": "Suma", "descripcion": "",
                     "cantidad_contenidos": 3, "cantidad_ejercicios": 2,
                     "progreso": {"estado": "INICIADO", "desbloqueado": true,
                                  "porcentaje_acierto": 50.0, "intentos_realizados": 1}},
                    {"id": 11, "orden": 2, "titulo": "Resta", "descripcion": ""}
                ],
                "progreso": {"estado": "EN_PROGRESO", "porcentaje_completado": 0.0}
            }"#,
        )
        .unwrap();
        assert_eq!(detail.topics.len(), 2);
        assert_eq!(detail.topics[0].status(), TopicStatus::InProgress);
        assert_eq!(detail.topics[1].status(), TopicStatus::NotStarted);
        assert!(detail.topics[1].progress.is_none());
    }
}
