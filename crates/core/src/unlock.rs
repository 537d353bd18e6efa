//! Sequential unlock rules for lessons and topics.

use crate::model::{Lesson, TopicSummary};

/// Lesson `k > 1` opens only once lesson `k - 1` is completed.
///
/// The predecessor is looked up by `orden`, not by slice position, so an
/// unsorted list gives the same answer. A missing predecessor keeps the lesson
/// locked.
#[must_use]
pub fn lesson_unlocked(all: &[Lesson], lesson: &Lesson) -> bool {
    if lesson.position <= 1 {
        return true;
    }
    all.iter()
        .find(|other| other.position + 1 == lesson.position)
        .is_some_and(|previous| previous.progress.is_completed())
}

/// Topics carry their unlock flag from the backend; no progress means locked.
#[must_use]
pub fn topic_unlocked(topic: &TopicSummary) -> bool {
    topic
        .progress
        .as_ref()
        .is_some_and(|progress| progress.unlocked)
}
