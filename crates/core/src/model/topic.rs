use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::markup::RichText;
use crate::model::{ContentId, ExerciseId, LessonId, TopicId, TopicProgress};

//
// ─── CONTENT ──────────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "TEORIA")]
    Theory,
    #[serde(rename = "EJEMPLO")]
    Example,
    /// Optional worked example. Plain forward navigation never enters one.
    #[serde(rename = "EJEMPLO_EXTRA")]
    ExtraExample,
}

impl ContentKind {
    #[must_use]
    pub fn is_extra(self) -> bool {
        matches!(self, Self::ExtraExample)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Theory => "Teoría",
            Self::Example => "Ejemplo",
            Self::ExtraExample => "Ejemplo adicional",
        }
    }
}

/// One slide of a topic's content sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    #[serde(rename = "tipo")]
    pub kind: ContentKind,
    #[serde(rename = "tipo_display", default)]
    pub kind_label: Option<String>,
    #[serde(rename = "orden", default)]
    pub position: u32,
    #[serde(rename = "contenido_texto", default)]
    pub body: RichText,
}

impl ContentItem {
    #[must_use]
    pub fn display_kind(&self) -> &str {
        self.kind_label
            .as_deref()
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| self.kind.label())
    }
}

//
// ─── EXERCISES ────────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseKind {
    /// Free-text answer.
    #[serde(rename = "ABIERTO")]
    Open,
    #[serde(rename = "MULTIPLE")]
    MultipleChoice,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "FACIL")]
    Easy,
    #[serde(rename = "INTERMEDIO")]
    Intermediate,
    #[serde(rename = "DIFICIL")]
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Fácil",
            Self::Intermediate => "Intermedio",
            Self::Hard => "Difícil",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    #[serde(rename = "letra")]
    pub letter: String,
    #[serde(rename = "texto")]
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    #[serde(rename = "orden", default)]
    pub position: u32,
    #[serde(rename = "tipo")]
    pub kind: ExerciseKind,
    #[serde(rename = "dificultad", default)]
    pub difficulty: Option<Difficulty>,
    #[serde(rename = "dificultad_display", default)]
    pub difficulty_label: Option<String>,
    #[serde(rename = "mostrar_dificultad", default)]
    pub show_difficulty: bool,
    #[serde(rename = "instruccion", default)]
    pub instruction: String,
    #[serde(rename = "enunciado", default)]
    pub statement: RichText,
    #[serde(rename = "opciones", default)]
    pub options: Vec<ChoiceOption>,
    #[serde(rename = "texto_ayuda", default)]
    pub help_text: Option<String>,
    #[serde(rename = "tiene_ayuda", default)]
    pub has_help: bool,
    #[serde(rename = "retroalimentacion_correcta", default)]
    pub feedback_correct: Option<String>,
    #[serde(rename = "retroalimentacion_incorrecta", default)]
    pub feedback_incorrect: Option<String>,
}

impl Exercise {
    /// The hint text, if the exercise offers a non-empty one.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.help_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    #[must_use]
    pub fn has_hint(&self) -> bool {
        self.has_help || self.hint().is_some()
    }

    /// Stored feedback for a known outcome, used when rebuilding prior results.
    #[must_use]
    pub fn feedback_for(&self, correct: bool) -> Option<String> {
        let stored = if correct {
            &self.feedback_correct
        } else {
            &self.feedback_incorrect
        };
        stored.clone().filter(|text| !text.trim().is_empty())
    }

    #[must_use]
    pub fn difficulty_badge(&self) -> Option<String> {
        if !self.show_difficulty {
            return None;
        }
        self.difficulty_label
            .clone()
            .filter(|label| !label.trim().is_empty())
            .or_else(|| self.difficulty.map(|d| d.label().to_string()))
    }
}

/// An answer the student already gave in an earlier visit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorAnswer {
    #[serde(rename = "respuesta_usuario", default)]
    pub answer: String,
    #[serde(rename = "es_correcta")]
    pub correct: bool,
    #[serde(rename = "uso_ayuda", default)]
    pub used_hint: bool,
}

//
// ─── TOPIC PAYLOAD ────────────────────────────────────────────────────────────
//

/// Everything the topic screen needs: slides, exercises and prior answers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopicContent {
    pub id: TopicId,
    #[serde(rename = "leccion", alias = "leccion_id", default)]
    pub lesson_id: Option<LessonId>,
    #[serde(rename = "orden", default)]
    pub position: u32,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default)]
    pub description: RichText,
    #[serde(rename = "contenidos", default)]
    pub contents: Vec<ContentItem>,
    #[serde(rename = "ejercicios", default)]
    pub exercises: Vec<Exercise>,
    #[serde(
        rename = "ejercicios_respondidos",
        default,
        deserialize_with = "answered_by_exercise"
    )]
    pub answered: HashMap<ExerciseId, PriorAnswer>,
    #[serde(rename = "siguiente_ejercicio_index", default)]
    pub next_exercise_index: usize,
    #[serde(rename = "total_ejercicios_respondidos", default)]
    pub answered_total: usize,
    #[serde(rename = "progreso", default)]
    pub progress: Option<TopicProgress>,
}

impl TopicContent {
    /// Index of the first exercise to show when entering the exercise phase.
    ///
    /// Clamped so that a stale backend pointer never indexes past the end.
    #[must_use]
    pub fn next_unanswered(&self) -> usize {
        self.next_exercise_index
            .min(self.exercises.len().saturating_sub(1))
    }

    /// How many of this topic's exercises already have an answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        if self.answered_total > 0 {
            return self.answered_total;
        }
        self.exercises
            .iter()
            .filter(|exercise| self.answered.contains_key(&exercise.id))
            .count()
    }
}

/// JSON object keys are strings; the backend keys answers by exercise id.
fn answered_by_exercise<'de, D>(deserializer: D) -> Result<HashMap<ExerciseId, PriorAnswer>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, PriorAnswer>> = Option::deserialize(deserializer)?;
    raw.unwrap_or_default()
        .into_iter()
        .map(|(key, answer)| {
            key.parse::<ExerciseId>()
                .map(|id| (id, answer))
                .map_err(serde::de::Error::custom)
        })
        .collect()
}
