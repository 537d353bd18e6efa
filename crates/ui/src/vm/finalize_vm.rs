use matelog_core::model::FinalizeOutcome;

use crate::routes::Route;

/// Shown in the failure message only; the pass decision is the backend's `aprobado`.
pub const PASS_THRESHOLD_PERCENT: u8 = 80;

#[derive(Clone, Debug, PartialEq)]
pub enum FinalizeAction {
    Navigate(Route),
    Retry,
}

/// The confirm dialog that follows "Finalizar Tema".
#[derive(Clone, Debug, PartialEq)]
pub struct FinalizeDialog {
    pub passed: bool,
    pub message: String,
    pub accept_label: &'static str,
    pub accept: FinalizeAction,
    /// `None` when there is nothing to choose, only to acknowledge.
    pub decline: Option<(&'static str, FinalizeAction)>,
}

impl FinalizeDialog {
    #[must_use]
    pub fn message_lines(&self) -> Vec<&str> {
        self.message.lines().collect()
    }
}

#[must_use]
pub fn finalize_dialog(outcome: &FinalizeOutcome) -> FinalizeDialog {
    let percent = outcome.rounded_accuracy();
    let back_to_lesson = FinalizeAction::Navigate(Route::LessonDetail {
        id: outcome.lesson_id.value(),
    });

    if outcome.passed {
        return match outcome.next_topic_id {
            Some(next) => FinalizeDialog {
                passed: true,
                message: format!(
                    "¡Felicidades! Obtuviste {percent}% de calificación.\n\n¿Deseas avanzar al siguiente tema?"
                ),
                accept_label: "Siguiente Tema",
                accept: FinalizeAction::Navigate(Route::Topic { id: next.value() }),
                decline: Some(("Volver a la Lección", back_to_lesson)),
            },
            None => FinalizeDialog {
                passed: true,
                message: format!(
                    "¡Felicidades! Obtuviste {percent}% de calificación.\n\nHas completado todos los temas de esta lección."
                ),
                accept_label: "Volver a la Lección",
                accept: back_to_lesson,
                decline: None,
            },
        };
    }

    let improvement = outcome
        .improvement_versus_previous()
        .map(|delta| {
            let sign = if delta > 0.0 { "+" } else { "" };
            format!(
                "\n\nMejoraste {sign}{}% respecto a tu intento anterior.",
                delta.round() as i64
            )
        })
        .unwrap_or_default();

    FinalizeDialog {
        passed: false,
        message: format!(
            "Obtuviste {percent}% de calificación.\nNecesitas mínimo {PASS_THRESHOLD_PERCENT}% para avanzar.{improvement}\n\n¿Deseas volver a intentarlo?"
        ),
        accept_label: "Reintentar",
        accept: FinalizeAction::Retry,
        decline: Some(("Volver a la Lección", back_to_lesson)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matelog_core::model::{LessonId, TopicId};

    fn outcome(passed: bool, accuracy: f64) -> FinalizeOutcome {
        FinalizeOutcome {
            passed,
            accuracy,
            correct_count: None,
            total_count: None,
            lesson_id: LessonId::new(3),
            topic_id: Some(TopicId::new(41)),
            next_topic_id: None,
            attempt: 1,
            improvement: None,
        }
    }

    #[test]
    fn first_failed_attempt_has_no_improvement_clause() {
        let dialog = finalize_dialog(&outcome(false, 60.0));
        assert_eq!(
            dialog.message,
            "Obtuviste 60% de calificación.\nNecesitas mínimo 80% para avanzar.\n\n¿Deseas volver a intentarlo?"
        );
        assert_eq!(dialog.accept, FinalizeAction::Retry);
        assert_eq!(
            dialog.decline.map(|(_, action)| action),
            Some(FinalizeAction::Navigate(Route::LessonDetail { id: 3 }))
        );
    }

    #[test]
    fn later_failed_attempt_reports_the_improvement() {
        let dialog = finalize_dialog(&FinalizeOutcome {
            attempt: 2,
            improvement: Some(20.0),
            ..outcome(false, 70.0)
        });
        assert!(dialog.message.contains("\n\nMejoraste +20% respecto a tu intento anterior."));

        let worse = finalize_dialog(&FinalizeOutcome {
            attempt: 3,
            improvement: Some(-10.0),
            ..outcome(false, 60.0)
        });
        assert!(worse.message.contains("Mejoraste -10% respecto"));
    }

    #[test]
    fn pass_with_next_topic_offers_to_move_on() {
        let dialog = finalize_dialog(&FinalizeOutcome {
            next_topic_id: Some(TopicId::new(42)),
            ..outcome(true, 85.0)
        });
        assert!(dialog.message.starts_with("¡Felicidades! Obtuviste 85% de calificación."));
        assert!(dialog.message.ends_with("¿Deseas avanzar al siguiente tema?"));
        assert_eq!(dialog.accept, FinalizeAction::Navigate(Route::Topic { id: 42 }));
    }

    #[test]
    fn pass_on_the_last_topic_returns_to_the_lesson() {
        let dialog = finalize_dialog(&outcome(true, 100.0));
        assert!(dialog.message.ends_with("Has completado todos los temas de esta lección."));
        assert_eq!(dialog.accept, FinalizeAction::Navigate(Route::LessonDetail { id: 3 }));
        assert_eq!(dialog.decline, None);
    }

    #[test]
    fn backend_verdict_wins_over_the_displayed_threshold() {
        let dialog = finalize_dialog(&outcome(false, 82.0));
        assert!(!dialog.passed);
        assert_eq!(dialog.accept, FinalizeAction::Retry);
    }
}
