use matelog_core::RichText;
use matelog_core::model::{LessonId, TopicId, TopicStatus};
use services::{LessonEntry, TopicEntry};

use crate::routes::Route;

pub const LOCKED_LESSON_NOTICE: &str = "Debes completar la lección anterior primero";
pub const LOCKED_TOPIC_NOTICE: &str = "Debes completar el tema anterior primero";

/// What a click on a card should do.
#[derive(Clone, Debug, PartialEq)]
pub enum CardClick {
    Open(Route),
    Locked(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LessonCardVm {
    pub id: LessonId,
    pub number_label: String,
    pub title: String,
    pub summary: String,
    pub percent: u8,
    pub locked: bool,
    pub completed: bool,
}

impl LessonCardVm {
    #[must_use]
    pub fn progress_style(&self) -> String {
        format!("width: {}%", self.percent)
    }

    #[must_use]
    pub fn click(&self) -> CardClick {
        if self.locked {
            CardClick::Locked(LOCKED_LESSON_NOTICE)
        } else {
            CardClick::Open(Route::LessonDetail { id: self.id.value() })
        }
    }
}

#[must_use]
pub fn map_lesson_cards(entries: &[LessonEntry]) -> Vec<LessonCardVm> {
    entries
        .iter()
        .map(|entry| LessonCardVm {
            id: entry.lesson.id,
            number_label: format!("Lección {}", entry.lesson.position),
            title: entry.lesson.title.clone(),
            summary: entry.lesson.description.plain_text(),
            percent: percent(entry.lesson.progress.percent_complete),
            locked: !entry.unlocked,
            completed: entry.lesson.progress.is_completed(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct TopicCardVm {
    pub id: TopicId,
    pub number_label: String,
    pub title: String,
    pub description: RichText,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub locked: bool,
    pub score_label: Option<String>,
    pub attempts_label: Option<String>,
}

impl TopicCardVm {
    #[must_use]
    pub fn click(&self) -> CardClick {
        if self.locked {
            CardClick::Locked(LOCKED_TOPIC_NOTICE)
        } else {
            CardClick::Open(Route::Topic { id: self.id.value() })
        }
    }
}

#[must_use]
pub fn map_topic_cards(entries: &[TopicEntry]) -> Vec<TopicCardVm> {
    entries
        .iter()
        .map(|entry| {
            let status = entry.topic.status();
            let (accuracy, attempts) = entry
                .topic
                .progress
                .as_ref()
                .map_or((0.0, 0), |progress| (progress.accuracy, progress.attempts));
            let score_label =
                (accuracy > 0.0).then(|| format!("Aciertos: {}%", percent(accuracy)));
            let attempts_label = (score_label.is_some() && attempts > 1)
                .then(|| format!("(Intento {attempts})"));

            TopicCardVm {
                id: entry.topic.id,
                number_label: format!("Tema {}", entry.topic.position),
                title: entry.topic.title.clone(),
                description: entry.topic.description.clone(),
                status_label: status.label(),
                status_class: status_class(status),
                locked: !entry.unlocked,
                score_label,
                attempts_label,
            }
        })
        .collect()
}

fn status_class(status: TopicStatus) -> &'static str {
    match status {
        TopicStatus::NotStarted => "topic-grey",
        TopicStatus::InProgress => "topic-blue",
        TopicStatus::Completed => "topic-green",
    }
}

/// Rounded and clamped to 0..=100.
#[must_use]
pub fn percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use matelog_core::model::{Lesson, LessonProgress, LessonStatus, TopicProgress, TopicSummary};

    fn lesson_entry(position: u32, percent_complete: f64, unlocked: bool) -> LessonEntry {
        LessonEntry {
            lesson: Lesson {
                id: LessonId::new(u64::from(position) * 10),
                position,
                title: format!("Lección de prueba {position}"),
                description: RichText::new("<p>Fracciones <b>básicas</b></p>"),
                topic_count: Some(2),
                progress: LessonProgress {
                    status: LessonStatus::InProgress,
                    percent_complete,
                    completed: None,
                },
            },
            unlocked,
        }
    }

    fn topic_entry(progress: Option<TopicProgress>, unlocked: bool) -> TopicEntry {
        TopicEntry {
            topic: TopicSummary {
                id: TopicId::new(7),
                position: 2,
                title: "Suma".into(),
                description: RichText::default(),
                content_count: None,
                exercise_count: None,
                progress,
            },
            unlocked,
        }
    }

    #[test]
    fn lesson_cards_round_progress_and_strip_markup() {
        let cards = map_lesson_cards(&[lesson_entry(1, 66.6, true)]);
        assert_eq!(cards[0].percent, 67);
        assert_eq!(cards[0].progress_style(), "width: 67%");
        assert_eq!(cards[0].summary, "Fracciones básicas");
        assert_eq!(cards[0].number_label, "Lección 1");
    }

    #[test]
    fn locked_lesson_click_shows_notice_instead_of_navigating() {
        let cards = map_lesson_cards(&[lesson_entry(1, 0.0, true), lesson_entry(2, 0.0, false)]);
        assert_eq!(cards[0].click(), CardClick::Open(Route::LessonDetail { id: 10 }));
        assert_eq!(cards[1].click(), CardClick::Locked(LOCKED_LESSON_NOTICE));
    }

    #[test]
    fn topic_card_shows_score_and_attempts_after_the_first() {
        let progress = TopicProgress {
            status: TopicStatus::InProgress,
            unlocked: true,
            accuracy: 49.5,
            attempts: 3,
        };
        let card = &map_topic_cards(&[topic_entry(Some(progress), true)])[0];
        assert_eq!(card.status_label, "En progreso");
        assert_eq!(card.status_class, "topic-blue");
        assert_eq!(card.score_label.as_deref(), Some("Aciertos: 50%"));
        assert_eq!(card.attempts_label.as_deref(), Some("(Intento 3)"));
        assert_eq!(card.click(), CardClick::Open(Route::Topic { id: 7 }));
    }

    #[test]
    fn topic_without_progress_is_locked_and_not_started() {
        let card = &map_topic_cards(&[topic_entry(None, false)])[0];
        assert_eq!(card.status_label, "Sin iniciar");
        assert_eq!(card.score_label, None);
        assert_eq!(card.click(), CardClick::Locked(LOCKED_TOPIC_NOTICE));
    }
}
