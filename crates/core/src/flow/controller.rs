use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::flow::NavigationHistory;
use crate::model::{
    AnswerSubmission, ContentItem, Exercise, ExerciseId, TopicContent, TopicId, ValidationResult,
};
use crate::time::Clock;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlowError {
    #[error("the topic is not showing exercises")]
    NotInExercisePhase,
    #[error("no exercise is selected")]
    NoCurrentExercise,
    #[error("exercise {0} is not part of this topic")]
    UnknownExercise(ExerciseId),
    #[error("the answer is empty")]
    EmptyAnswer,
    #[error("exercise {0} was already answered")]
    AlreadyAnswered(ExerciseId),
}

//
// ─── STATE ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Content,
    Exercises,
}

/// What a navigation request did to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved forward to the content item at this index.
    Moved(usize),
    /// The next item is an extra example; only the explicit branch actions pass it.
    Blocked,
    /// Switched to the exercise phase at this exercise index.
    EnteredExercises(usize),
    /// Popped the history back to this content index.
    WentBack(usize),
    /// The action is not offered in the current state. Nothing changed.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseStep {
    Advanced(usize),
    /// The last exercise is done; the topic should be finalized.
    Finalize,
}

/// Content/exercise state machine for one loaded topic.
///
/// All state belongs to `topic().id`. Loading another topic means building a
/// new controller (or calling [`TopicFlow::reload`]), never patching this one.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicFlow {
    topic: TopicContent,
    clock: Clock,
    phase: Phase,
    content_index: usize,
    exercise_index: usize,
    history: NavigationHistory,
    answers: HashMap<ExerciseId, String>,
    results: HashMap<ExerciseId, ValidationResult>,
    help_visible: HashSet<ExerciseId>,
    start_times: HashMap<ExerciseId, DateTime<Utc>>,
}

impl TopicFlow {
    /// Builds the initial state for a freshly fetched topic.
    ///
    /// Prior answers are restored together with the stored feedback for their
    /// outcome. A topic without content starts on its exercises.
    #[must_use]
    pub fn new(topic: TopicContent, clock: Clock) -> Self {
        let mut answers = HashMap::new();
        let mut results = HashMap::new();
        for exercise in &topic.exercises {
            if let Some(prior) = topic.answered.get(&exercise.id) {
                answers.insert(exercise.id, prior.answer.clone());
                results.insert(
                    exercise.id,
                    ValidationResult {
                        correct: prior.correct,
                        feedback: exercise.feedback_for(prior.correct),
                    },
                );
            }
        }

        let mut flow = Self {
            topic,
            clock,
            phase: Phase::Content,
            content_index: 0,
            exercise_index: 0,
            history: NavigationHistory::default(),
            answers,
            results,
            help_visible: HashSet::new(),
            start_times: HashMap::new(),
        };
        if flow.topic.contents.is_empty() {
            flow.enter_exercises();
        }
        flow
    }

    /// Discards every piece of local state and starts over from `topic`.
    pub fn reload(&mut self, topic: TopicContent) {
        *self = Self::new(topic, self.clock);
    }

    //
    // ─── READS ────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn topic(&self) -> &TopicContent {
        &self.topic
    }

    #[must_use]
    pub fn topic_id(&self) -> TopicId {
        self.topic.id
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn content_index(&self) -> usize {
        self.content_index
    }

    #[must_use]
    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    #[must_use]
    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    #[must_use]
    pub fn answers(&self) -> &HashMap<ExerciseId, String> {
        &self.answers
    }

    #[must_use]
    pub fn results(&self) -> &HashMap<ExerciseId, ValidationResult> {
        &self.results
    }

    #[must_use]
    pub fn answer(&self, id: ExerciseId) -> Option<&str> {
        self.answers.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn result(&self, id: ExerciseId) -> Option<&ValidationResult> {
        self.results.get(&id)
    }

    #[must_use]
    pub fn is_help_visible(&self, id: ExerciseId) -> bool {
        self.help_visible.contains(&id)
    }

    #[must_use]
    pub fn start_time(&self, id: ExerciseId) -> Option<DateTime<Utc>> {
        self.start_times.get(&id).copied()
    }

    #[must_use]
    pub fn current_content(&self) -> Option<&ContentItem> {
        self.topic.contents.get(self.content_index)
    }

    #[must_use]
    pub fn current_exercise(&self) -> Option<&Exercise> {
        match self.phase {
            Phase::Exercises => self.topic.exercises.get(self.exercise_index),
            Phase::Content => None,
        }
    }

    #[must_use]
    pub fn is_last_content(&self) -> bool {
        self.content_index + 1 >= self.topic.contents.len()
    }

    #[must_use]
    pub fn is_last_exercise(&self) -> bool {
        self.exercise_index + 1 >= self.topic.exercises.len()
    }

    /// True when the item after the current one is an extra example.
    #[must_use]
    pub fn has_next_extra_example(&self) -> bool {
        self.topic
            .contents
            .get(self.content_index + 1)
            .is_some_and(|item| item.kind.is_extra())
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.phase == Phase::Content && self.history.can_go_back()
    }

    #[must_use]
    pub fn can_return_to_content(&self) -> bool {
        self.phase == Phase::Exercises && !self.topic.contents.is_empty()
    }

    /// After an incorrect result the hint is shown unless the student already opened it.
    #[must_use]
    pub fn shows_automatic_hint(&self, exercise: &Exercise) -> bool {
        self.results
            .get(&exercise.id)
            .is_some_and(|result| !result.correct)
            && exercise.hint().is_some()
            && !self.is_help_visible(exercise.id)
    }

    //
    // ─── CONTENT PHASE ────────────────────────────────────────────────────────
    //

    /// Plain "continue": one step forward, or into the exercises from the last item.
    pub fn continue_forward(&mut self) -> Transition {
        if self.phase != Phase::Content {
            return Transition::Unavailable;
        }
        if self.is_last_content() {
            return self.enter_exercises();
        }
        if self.has_next_extra_example() {
            return Transition::Blocked;
        }
        self.move_to(self.content_index + 1)
    }

    /// The primary button: skips over an upcoming extra-example branch, otherwise continues.
    pub fn advance(&mut self) -> Transition {
        if self.has_next_extra_example() {
            self.skip_extra_examples()
        } else {
            self.continue_forward()
        }
    }

    pub fn show_extra_example(&mut self) -> Transition {
        if self.phase != Phase::Content || self.is_last_content() {
            return Transition::Unavailable;
        }
        self.move_to(self.content_index + 1)
    }

    pub fn skip_extra_examples(&mut self) -> Transition {
        if self.phase != Phase::Content {
            return Transition::Unavailable;
        }
        let next = self.topic.contents[self.content_index + 1..]
            .iter()
            .position(|item| !item.kind.is_extra())
            .map(|offset| self.content_index + 1 + offset);
        match next {
            Some(index) => self.move_to(index),
            None => self.enter_exercises(),
        }
    }

    /// Shortcut straight to the exercises, offered on every item but the last.
    pub fn go_to_exercises(&mut self) -> Transition {
        if self.phase != Phase::Content || self.is_last_content() {
            return Transition::Unavailable;
        }
        self.enter_exercises()
    }

    pub fn go_back(&mut self) -> Transition {
        if !self.can_go_back() {
            return Transition::Unavailable;
        }
        match self.history.pop() {
            Some(index) => {
                self.content_index = index;
                Transition::WentBack(index)
            }
            None => Transition::Unavailable,
        }
    }

    fn move_to(&mut self, index: usize) -> Transition {
        self.history.push(index);
        self.content_index = index;
        Transition::Moved(index)
    }

    fn enter_exercises(&mut self) -> Transition {
        self.phase = Phase::Exercises;
        self.exercise_index = self.topic.next_unanswered();
        self.mark_shown();
        Transition::EnteredExercises(self.exercise_index)
    }

    //
    // ─── EXERCISE PHASE ───────────────────────────────────────────────────────
    //

    pub fn answer_change(&mut self, id: ExerciseId, value: impl Into<String>) {
        self.answers.insert(id, value.into());
    }

    /// Flips the hint for `id` and returns whether it is now visible.
    pub fn toggle_help(&mut self, id: ExerciseId) -> bool {
        if self.help_visible.remove(&id) {
            false
        } else {
            self.help_visible.insert(id);
            true
        }
    }

    /// Builds the validation request for the current exercise.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::EmptyAnswer` for a blank answer and
    /// `FlowError::AlreadyAnswered` once a result is recorded. Nothing is sent
    /// in either case.
    pub fn submission(&self) -> Result<AnswerSubmission, FlowError> {
        if self.phase != Phase::Exercises {
            return Err(FlowError::NotInExercisePhase);
        }
        let exercise = self.current_exercise().ok_or(FlowError::NoCurrentExercise)?;
        if self.results.contains_key(&exercise.id) {
            return Err(FlowError::AlreadyAnswered(exercise.id));
        }
        let answer = self
            .answers
            .get(&exercise.id)
            .filter(|answer| !answer.trim().is_empty())
            .ok_or(FlowError::EmptyAnswer)?;
        let elapsed_seconds = self
            .start_times
            .get(&exercise.id)
            .map_or(0, |shown_at| self.clock.elapsed_seconds(*shown_at));

        Ok(AnswerSubmission {
            exercise_id: exercise.id,
            answer: answer.clone(),
            used_hint: self.is_help_visible(exercise.id),
            elapsed_seconds,
        })
    }

    /// Stores the backend's verdict for `id`.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::UnknownExercise` if `id` does not belong to this topic.
    pub fn record_result(
        &mut self,
        id: ExerciseId,
        result: ValidationResult,
    ) -> Result<(), FlowError> {
        if !self.topic.exercises.iter().any(|exercise| exercise.id == id) {
            return Err(FlowError::UnknownExercise(id));
        }
        self.results.insert(id, result);
        Ok(())
    }

    /// Moves to the next exercise, or reports that the topic should be finalized.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::NotInExercisePhase` while content is showing.
    pub fn next_exercise(&mut self) -> Result<ExerciseStep, FlowError> {
        if self.phase != Phase::Exercises {
            return Err(FlowError::NotInExercisePhase);
        }
        if self.is_last_exercise() {
            return Ok(ExerciseStep::Finalize);
        }
        self.exercise_index += 1;
        self.mark_shown();
        Ok(ExerciseStep::Advanced(self.exercise_index))
    }

    /// Returns to the first content item with a root-only history.
    ///
    /// Answers and results survive; only navigation is reset.
    pub fn back_to_topic(&mut self) -> Transition {
        if !self.can_return_to_content() {
            return Transition::Unavailable;
        }
        self.phase = Phase::Content;
        self.content_index = 0;
        self.history.reset();
        Transition::Moved(0)
    }

    /// Steps a fixed clock forward. A system clock is unaffected.
    pub fn advance_clock(&mut self, delta: Duration) {
        self.clock.advance(delta);
    }

    fn mark_shown(&mut self) {
        if let Some(id) = self.topic.exercises.get(self.exercise_index).map(|e| e.id) {
            let now = self.clock.now();
            self.start_times.entry(id).or_insert(now);
        }
    }
}
