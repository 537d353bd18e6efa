use std::sync::Arc;

use api::LessonGateway;
use matelog_core::model::{Lesson, LessonDetail, LessonId, TopicSummary};
use matelog_core::unlock::{lesson_unlocked, topic_unlocked};

use crate::error::LessonError;

/// A lesson card with its computed lock state.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonEntry {
    pub lesson: Lesson,
    pub unlocked: bool,
}

/// A topic row with its lock state.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicEntry {
    pub topic: TopicSummary,
    pub unlocked: bool,
}

/// Lesson detail with topics ordered by position.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonOverview {
    pub detail: LessonDetail,
    pub topics: Vec<TopicEntry>,
}

/// Read side of the lesson catalogue.
#[derive(Clone)]
pub struct LessonService {
    lessons: Arc<dyn LessonGateway>,
}

impl LessonService {
    #[must_use]
    pub fn new(lessons: Arc<dyn LessonGateway>) -> Self {
        Self { lessons }
    }

    /// All lessons ordered by position, each tagged with whether it may be opened.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::SessionExpired` when the cookie session is gone.
    /// Returns `LessonError::Api` for any other backend failure.
    pub async fn list_lessons(&self) -> Result<Vec<LessonEntry>, LessonError> {
        let mut lessons = self.lessons.list_lessons().await?;
        lessons.sort_by_key(|lesson| lesson.position);
        let entries = lessons
            .iter()
            .map(|lesson| LessonEntry {
                lesson: lesson.clone(),
                unlocked: lesson_unlocked(&lessons, lesson),
            })
            .collect::<Vec<_>>();
        tracing::debug!(count = entries.len(), "lessons loaded");
        Ok(entries)
    }

    /// # Errors
    ///
    /// Returns `LessonError::Locked` for a lesson the backend refuses to open.
    /// Returns `LessonError::NotFound` for an unknown id.
    /// Returns `LessonError::SessionExpired` when the cookie session is gone.
    pub async fn lesson_detail(&self, id: LessonId) -> Result<LessonOverview, LessonError> {
        let mut detail = self.lessons.lesson_detail(id).await?;
        detail.topics.sort_by_key(|topic| topic.position);
        let topics = detail
            .topics
            .iter()
            .map(|topic| TopicEntry {
                topic: topic.clone(),
                unlocked: topic_unlocked(topic),
            })
            .collect();
        Ok(LessonOverview { detail, topics })
    }
}
