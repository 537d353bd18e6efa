use matelog_core::flow::{Phase, TopicFlow};
use matelog_core::model::ScreenKind;

pub const EMPTY_ANSWER_NOTICE: &str = "Por favor ingresa una respuesta";
pub const VALIDATE_ERROR_NOTICE: &str = "Error al validar respuesta";
pub const FINALIZE_ERROR_NOTICE: &str = "Error al finalizar tema. Por favor intenta de nuevo.";
pub const RETRY_ERROR_NOTICE: &str = "Error al reintentar el tema. Por favor intenta de nuevo.";

#[must_use]
pub fn screen_for_phase(phase: Phase) -> ScreenKind {
    match phase {
        Phase::Content => ScreenKind::TopicContent,
        Phase::Exercises => ScreenKind::Exercises,
    }
}

/// Buttons and labels of the content pane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentPaneVm {
    pub title: String,
    pub show_back: bool,
    /// "Ver Otro Ejemplo" next to the primary button.
    pub show_extra: bool,
    pub primary_label: &'static str,
    pub show_go_to_exercises: bool,
    pub answered_info: Option<String>,
    pub progress: String,
}

impl ContentPaneVm {
    #[must_use]
    pub fn from_flow(flow: &TopicFlow) -> Self {
        let topic = flow.topic();
        let last = flow.is_last_content();
        let extra_next = flow.has_next_extra_example();
        Self {
            title: topic.title.clone(),
            show_back: flow.can_go_back(),
            show_extra: extra_next,
            primary_label: if last {
                "Ir a Ejercicios"
            } else {
                "Continuar"
            },
            show_go_to_exercises: !last,
            answered_info: answered_info(flow),
            progress: format!("{} / {}", flow.content_index() + 1, topic.contents.len()),
        }
    }
}

fn answered_info(flow: &TopicFlow) -> Option<String> {
    let topic = flow.topic();
    let answered = topic.answered_count();
    if answered == 0 {
        return None;
    }
    let total = topic.exercises.len();
    let mut line = format!("Ya has respondido {answered} de {total} ejercicios.");
    if topic.next_exercise_index < total {
        line.push_str(&format!(
            " Continuarás desde el ejercicio {}.",
            topic.next_exercise_index + 1
        ));
    }
    Some(line)
}

/// Labels of the exercise pane for the current exercise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExercisePaneVm {
    pub heading: String,
    pub number_label: String,
    pub difficulty: Option<String>,
    pub show_return: bool,
    pub help_label: &'static str,
    pub next_label: &'static str,
    pub progress: String,
}

impl ExercisePaneVm {
    #[must_use]
    pub fn from_flow(flow: &TopicFlow) -> Option<Self> {
        let exercise = flow.current_exercise()?;
        let topic = flow.topic();
        Some(Self {
            heading: format!("Ejercicios - {}", topic.title),
            number_label: format!("Ejercicio {}", exercise.position),
            difficulty: exercise.difficulty_badge(),
            show_return: flow.can_return_to_content(),
            help_label: if flow.is_help_visible(exercise.id) {
                "Ocultar Ayuda"
            } else {
                "Ver Ayuda"
            },
            next_label: if flow.is_last_exercise() {
                "Finalizar Tema"
            } else {
                "Siguiente Ejercicio"
            },
            progress: format!(
                "Ejercicio {} / {}",
                flow.exercise_index() + 1,
                topic.exercises.len()
            ),
        })
    }
}

#[must_use]
pub fn result_title(correct: bool) -> &'static str {
    if correct { "¡Correcto!" } else { "Incorrecto" }
}
