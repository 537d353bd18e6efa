use serde::{Deserialize, Serialize};

use crate::model::{ExerciseId, LessonId, TopicId};

/// Payload of `POST /lessons/ejercicios/validar/`. Sent once per exercise per attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    #[serde(rename = "ejercicio_id")]
    pub exercise_id: ExerciseId,
    #[serde(rename = "respuesta")]
    pub answer: String,
    #[serde(rename = "uso_ayuda")]
    pub used_hint: bool,
    #[serde(rename = "tiempo_respuesta_segundos")]
    pub elapsed_seconds: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(rename = "es_correcta")]
    pub correct: bool,
    #[serde(
        rename = "retroalimentacion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub feedback: Option<String>,
}

/// The backend's pass/fail decision for one topic attempt.
///
/// `passed` is authoritative; the client never recomputes it from the percentage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinalizeOutcome {
    #[serde(rename = "aprobado")]
    pub passed: bool,
    #[serde(rename = "porcentaje_acierto")]
    pub accuracy: f64,
    #[serde(rename = "ejercicios_correctos", default)]
    pub correct_count: Option<u32>,
    #[serde(rename = "ejercicios_totales", default)]
    pub total_count: Option<u32>,
    #[serde(rename = "leccion_id")]
    pub lesson_id: LessonId,
    #[serde(rename = "tema_id", default)]
    pub topic_id: Option<TopicId>,
    #[serde(rename = "siguiente_tema_id", default)]
    pub next_topic_id: Option<TopicId>,
    #[serde(rename = "numero_intento", default = "first_attempt")]
    pub attempt: u32,
    #[serde(rename = "mejora_porcentaje", default)]
    pub improvement: Option<f64>,
}

fn first_attempt() -> u32 {
    1
}

impl FinalizeOutcome {
    /// Accuracy rounded for display, like the percentage in the result message.
    #[must_use]
    pub fn rounded_accuracy(&self) -> i64 {
        self.accuracy.round() as i64
    }

    /// Improvement over the previous attempt. Only meaningful after the first one.
    #[must_use]
    pub fn improvement_versus_previous(&self) -> Option<f64> {
        if self.attempt > 1 {
            self.improvement
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_uses_backend_field_names() {
        let submission = AnswerSubmission {
            exercise_id: ExerciseId::new(4),
            answer: "3/4".into(),
            used_hint: true,
            elapsed_seconds: 12,
        };
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["ejercicio_id"], 4);
        assert_eq!(json["respuesta"], "3/4");
        assert_eq!(json["uso_ayuda"], true);
        assert_eq!(json["tiempo_respuesta_segundos"], 12);
    }

    #[test]
    fn improvement_is_hidden_on_first_attempt() {
        let outcome: FinalizeOutcome = serde_json::from_str(
            r#"{"aprobado": false, "porcentaje_acierto": 60.0, "leccion_id": 2,
                "numero_intento": 1, "mejora_porcentaje": 10.0}"#,
        )
        .unwrap();
        assert_eq!(outcome.improvement_versus_previous(), None);

        let retry = FinalizeOutcome {
            attempt: 2,
            ..outcome
        };
        assert_eq!(retry.improvement_versus_previous(), Some(10.0));
    }

    #[test]
    fn null_next_topic_parses() {
        let outcome: FinalizeOutcome = serde_json::from_str(
            r#"{"aprobado": true, "porcentaje_acierto": 84.6, "leccion_id": 2,
                "tema_id": 7, "siguiente_tema_id": null, "numero_intento": 1,
                "mejora_porcentaje": null}"#,
        )
        .unwrap();
        assert_eq!(outcome.next_topic_id, None);
        assert_eq!(outcome.rounded_accuracy(), 85);
    }
}
