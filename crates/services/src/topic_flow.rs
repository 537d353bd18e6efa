use std::sync::Arc;

use api::LessonGateway;
use matelog_core::flow::{TopicFlow, Transition};
use matelog_core::model::{
    ActivityId, AnswerSubmission, FinalizeOutcome, TopicId, ValidationResult,
};

use crate::Clock;
use crate::best_effort::best_effort;
use crate::error::TopicFlowError;
use crate::tracking::ScreenTracker;

/// Drives a `TopicFlow` against the backend.
///
/// The controller itself stays synchronous; this service performs the calls
/// that surround its transitions.
#[derive(Clone)]
pub struct TopicFlowService {
    clock: Clock,
    lessons: Arc<dyn LessonGateway>,
    tracker: ScreenTracker,
}

impl TopicFlowService {
    #[must_use]
    pub fn new(clock: Clock, lessons: Arc<dyn LessonGateway>, tracker: ScreenTracker) -> Self {
        Self {
            clock,
            lessons,
            tracker,
        }
    }

    /// Fetches a topic and builds its controller, restoring prior answers.
    ///
    /// # Errors
    ///
    /// Returns `TopicFlowError::Locked` for a topic that is not unlocked yet.
    /// Returns `TopicFlowError::NotFound` for an unknown id.
    /// Returns `TopicFlowError::SessionExpired` when the cookie session is gone.
    pub async fn load(&self, id: TopicId) -> Result<TopicFlow, TopicFlowError> {
        let topic = self.lessons.topic_content(id).await?;
        tracing::debug!(
            topic = %id,
            contents = topic.contents.len(),
            exercises = topic.exercises.len(),
            answered = topic.answered_count(),
            "topic loaded"
        );
        Ok(TopicFlow::new(topic, self.clock))
    }

    /// # Errors
    ///
    /// Returns `TopicFlowError::Api` if the backend cannot validate the answer.
    pub async fn validate(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<ValidationResult, TopicFlowError> {
        Ok(self.lessons.validate_answer(submission).await?)
    }

    /// Sends the current exercise's answer and stores the verdict in `flow`.
    ///
    /// Nothing is sent for an empty or already answered exercise.
    ///
    /// # Errors
    ///
    /// Returns `TopicFlowError::Flow` when the controller refuses to build a
    /// submission, and `TopicFlowError::Api` when validation fails.
    pub async fn submit(&self, flow: &mut TopicFlow) -> Result<ValidationResult, TopicFlowError> {
        let submission = flow.submission()?;
        let result = self.validate(&submission).await?;
        tracing::debug!(
            exercise = %submission.exercise_id,
            correct = result.correct,
            used_hint = submission.used_hint,
            "answer validated"
        );
        flow.record_result(submission.exercise_id, result.clone())?;
        Ok(result)
    }

    /// Counts a "back" click on the content screen tracked by `activity`.
    pub async fn notify_content_back(&self, activity: Option<ActivityId>) {
        if let Some(id) = activity {
            self.tracker.content_back(id).await;
        }
    }

    /// Pops content history and reports the click when it actually moved.
    pub async fn go_back(&self, flow: &mut TopicFlow, activity: Option<ActivityId>) -> Transition {
        let transition = flow.go_back();
        if matches!(transition, Transition::WentBack(_)) {
            self.notify_content_back(activity).await;
        }
        transition
    }

    /// Tells the backend the student left the exercises for the content. Best-effort.
    pub async fn notify_return_to_topic(&self, id: TopicId) {
        best_effort("lessons.return_to_topic", self.lessons.return_to_topic(id)).await;
    }

    /// Returns from the exercises to the first content item.
    pub async fn back_to_topic(&self, flow: &mut TopicFlow) -> Transition {
        if !flow.can_return_to_content() {
            return Transition::Unavailable;
        }
        self.notify_return_to_topic(flow.topic_id()).await;
        flow.back_to_topic()
    }

    /// Asks the backend whether the current attempt passed.
    ///
    /// # Errors
    ///
    /// Returns `TopicFlowError::Api` if the backend call fails; the flow is
    /// left untouched so the student can try again.
    pub async fn finalize(&self, flow: &TopicFlow) -> Result<FinalizeOutcome, TopicFlowError> {
        let outcome = self.lessons.finalize_topic(flow.topic_id()).await?;
        tracing::info!(
            topic = %flow.topic_id(),
            passed = outcome.passed,
            accuracy = outcome.accuracy,
            attempt = outcome.attempt,
            "topic finalized"
        );
        Ok(outcome)
    }

    /// Clears the attempt on the backend, then reloads `flow` from scratch.
    ///
    /// # Errors
    ///
    /// Returns `TopicFlowError::Api` if either call fails; `flow` is only
    /// replaced once the fresh topic has arrived.
    pub async fn retry(&self, flow: &mut TopicFlow) -> Result<(), TopicFlowError> {
        let id = flow.topic_id();
        self.lessons.retry_topic(id).await?;
        let topic = self.lessons.topic_content(id).await?;
        flow.reload(topic);
        tracing::info!(topic = %id, "topic attempt restarted");
        Ok(())
    }
}
