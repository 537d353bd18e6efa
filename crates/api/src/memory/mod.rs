//! In-process stand-in for the REST backend, used by tests and the demo mode.
//!
//! It follows the backend's rules closely enough for the client flows: cookie
//! session, 80% pass mark, sequential topic unlocking, retry clearing answers.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use matelog_core::model::{
    ActivityContext, ActivityId, ActivityRecord, AnswerSubmission, Credentials, ExerciseId,
    FinalizeOutcome, Lesson, LessonDetail, LessonId, LessonStatus, PriorAnswer, Registration,
    ScreenKind, StudySessionId, TopicContent, TopicId, TopicProgress, TopicStatus, User, UserId,
    ValidationResult,
};
use serde_json::json;

use crate::gateway::{ApiError, AuthGateway, LessonGateway, TrackingGateway};

mod demo;

pub use demo::{DEMO_PASSWORD, DEMO_USERNAME};

/// Pass mark applied when finalizing a topic.
const PASS_PERCENT: f64 = 80.0;

/// One gateway call, in the order it reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    FetchCsrf,
    Register(String),
    Login(String),
    Logout,
    Profile,
    ListLessons,
    LessonDetail(LessonId),
    TopicContent(TopicId),
    ValidateAnswer(AnswerSubmission),
    FinalizeTopic(TopicId),
    RetryTopic(TopicId),
    ReturnToTopic(TopicId),
    StartActivity(ScreenKind, ActivityContext),
    EndActivity(ActivityId),
    StartStudySession,
    EndStudySession(StudySessionId),
    ListActivities,
    ContentBack(ActivityId),
}

#[derive(Default)]
struct Attempt {
    count: u32,
    last_accuracy: Option<f64>,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, (String, User)>,
    signed_in: Option<User>,
    lessons: Vec<LessonDetail>,
    locked_lessons: HashSet<LessonId>,
    topics: HashMap<TopicId, TopicContent>,
    solutions: HashMap<ExerciseId, String>,
    responses: HashMap<TopicId, HashMap<ExerciseId, PriorAnswer>>,
    attempts: HashMap<TopicId, Attempt>,
    activities: Vec<ActivityRecord>,
    open_activities: HashSet<ActivityId>,
    open_sessions: HashSet<StudySessionId>,
    tracking_offline: bool,
    next_id: u64,
    calls: Vec<RecordedCall>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_user(&self) -> Result<&User, ApiError> {
        self.signed_in.as_ref().ok_or_else(|| ApiError::Unauthorized {
            payload: json!({"detail": "Las credenciales de autenticación no se proveyeron."}),
        })
    }

    fn require_tracking(&self) -> Result<(), ApiError> {
        self.require_user()?;
        if self.tracking_offline {
            return Err(ApiError::Transport("tracking endpoint unreachable".into()));
        }
        Ok(())
    }

    fn lesson_of(&self, topic: TopicId) -> Option<usize> {
        self.lessons
            .iter()
            .position(|lesson| lesson.topics.iter().any(|t| t.id == topic))
    }
}

/// Thread-safe fake backend. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(
        &self,
        f: impl FnOnce(&mut State) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        f(&mut *guard)
    }

    fn call<R>(
        &self,
        call: RecordedCall,
        f: impl FnOnce(&mut State) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        self.with_state(|state| {
            state.calls.push(call);
            f(state)
        })
    }

    /// Registers an account that can log in immediately.
    pub fn add_account(&self, user: User, password: &str) {
        let _ = self.with_state(|state| {
            state
                .accounts
                .insert(user.username.clone(), (password.to_string(), user));
            Ok(())
        });
    }

    /// Adds a lesson. Its topics' content must be added with [`Self::add_topic`].
    pub fn add_lesson(&self, lesson: LessonDetail) {
        let _ = self.with_state(|state| {
            state.lessons.push(lesson);
            state.lessons.sort_by_key(|lesson| lesson.position);
            Ok(())
        });
    }

    /// Adds a topic's slides and exercises with the accepted answer for each exercise.
    pub fn add_topic<'a>(
        &self,
        topic: TopicContent,
        solutions: impl IntoIterator<Item = (ExerciseId, &'a str)>,
    ) {
        let solutions: Vec<(ExerciseId, String)> = solutions
            .into_iter()
            .map(|(id, answer)| (id, answer.to_string()))
            .collect();
        let _ = self.with_state(|state| {
            state.solutions.extend(solutions);
            state.topics.insert(topic.id, topic);
            Ok(())
        });
    }

    /// Makes the lesson detail endpoint answer 403 for `id`.
    pub fn lock_lesson(&self, id: LessonId) {
        let _ = self.with_state(|state| {
            state.locked_lessons.insert(id);
            Ok(())
        });
    }

    /// While offline, every tracking endpoint fails with a transport error.
    pub fn set_tracking_offline(&self, offline: bool) {
        let _ = self.with_state(|state| {
            state.tracking_offline = offline;
            Ok(())
        });
    }

    /// Pretends a cookie session already exists, as after a page reload.
    pub fn restore_session(&self, username: &str) {
        let _ = self.with_state(|state| {
            state.signed_in = state.accounts.get(username).map(|(_, user)| user.clone());
            Ok(())
        });
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.with_state(|state| Ok(state.calls.clone()))
            .unwrap_or_default()
    }

    pub fn clear_calls(&self) {
        let _ = self.with_state(|state| {
            state.calls.clear();
            Ok(())
        });
    }

    #[must_use]
    pub fn signed_in_user(&self) -> Option<User> {
        self.with_state(|state| Ok(state.signed_in.clone()))
            .ok()
            .flatten()
    }

    #[must_use]
    pub fn open_activities(&self) -> usize {
        self.with_state(|state| Ok(state.open_activities.len()))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn open_study_sessions(&self) -> usize {
        self.with_state(|state| Ok(state.open_sessions.len()))
            .unwrap_or_default()
    }

    /// The stored answers of the current attempt for `topic`.
    #[must_use]
    pub fn stored_answers(&self, topic: TopicId) -> HashMap<ExerciseId, PriorAnswer> {
        self.with_state(|state| Ok(state.responses.get(&topic).cloned().unwrap_or_default()))
            .unwrap_or_default()
    }
}

#[async_trait]
impl AuthGateway for InMemoryBackend {
    async fn fetch_csrf_token(&self) -> Result<(), ApiError> {
        self.call(RecordedCall::FetchCsrf, |_| Ok(()))
    }

    async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        self.call(
            RecordedCall::Register(registration.username.clone()),
            |state| {
                if state.accounts.contains_key(&registration.username) {
                    return Err(ApiError::Rejected {
                        status: 400,
                        payload: json!({"username": ["Ya existe un usuario con este nombre."]}),
                    });
                }
                if registration.password != registration.password_confirm {
                    return Err(ApiError::Rejected {
                        status: 400,
                        payload: json!({"password": ["Las contraseñas no coinciden."]}),
                    });
                }
                let user = User {
                    id: UserId::new(state.next_id()),
                    username: registration.username.clone(),
                    group: Some(registration.group),
                    specialty: Some(registration.specialty),
                    gender: Some(registration.gender),
                    age: Some(registration.age),
                };
                state.accounts.insert(
                    registration.username.clone(),
                    (registration.password.clone(), user.clone()),
                );
                Ok(user)
            },
        )
    }

    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.call(RecordedCall::Login(credentials.username.clone()), |state| {
            let user = state
                .accounts
                .get(&credentials.username)
                .filter(|(password, _)| *password == credentials.password)
                .map(|(_, user)| user.clone())
                .ok_or_else(|| ApiError::Unauthorized {
                    payload: json!({"error": "Credenciales inválidas"}),
                })?;
            state.signed_in = Some(user.clone());
            Ok(user)
        })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.call(RecordedCall::Logout, |state| {
            state.require_user()?;
            state.signed_in = None;
            Ok(())
        })
    }

    async fn profile(&self) -> Result<User, ApiError> {
        self.call(RecordedCall::Profile, |state| state.require_user().cloned())
    }
}

#[async_trait]
impl LessonGateway for InMemoryBackend {
    async fn list_lessons(&self) -> Result<Vec<Lesson>, ApiError> {
        self.call(RecordedCall::ListLessons, |state| {
            state.require_user()?;
            Ok(state
                .lessons
                .iter()
                .map(|detail| Lesson {
                    id: detail.id,
                    position: detail.position,
                    title: detail.title.clone(),
                    description: detail.description.clone(),
                    topic_count: u32::try_from(detail.topics.len()).ok(),
                    progress: detail.progress.clone(),
                })
                .collect())
        })
    }

    async fn lesson_detail(&self, id: LessonId) -> Result<LessonDetail, ApiError> {
        self.call(RecordedCall::LessonDetail(id), |state| {
            state.require_user()?;
            if state.locked_lessons.contains(&id) {
                return Err(ApiError::Forbidden {
                    payload: json!({"error": "Debes completar la lección anterior"}),
                });
            }
            let lesson = state
                .lessons
                .iter_mut()
                .find(|lesson| lesson.id == id)
                .ok_or(ApiError::NotFound)?;
            if lesson.progress.status == LessonStatus::NotStarted {
                lesson.progress.status = LessonStatus::InProgress;
            }
            for topic in &mut lesson.topics {
                let progress = topic.progress.get_or_insert_with(TopicProgress::default);
                if topic.position == 1 {
                    progress.unlocked = true;
                }
            }
            Ok(lesson.clone())
        })
    }

    async fn topic_content(&self, id: TopicId) -> Result<TopicContent, ApiError> {
        self.call(RecordedCall::TopicContent(id), |state| {
            state.require_user()?;
            let mut topic = state.topics.get(&id).cloned().ok_or(ApiError::NotFound)?;
            let summary = state
                .lesson_of(id)
                .and_then(|index| state.lessons[index].topics.iter().find(|t| t.id == id));
            let unlocked = summary.is_some_and(|summary| {
                summary.position == 1 || summary.progress.as_ref().is_some_and(|p| p.unlocked)
            });
            if !unlocked {
                return Err(ApiError::Forbidden {
                    payload: json!({"error": "Este tema aún no está desbloqueado"}),
                });
            }

            let answered = state.responses.get(&id).cloned().unwrap_or_default();
            let next = topic
                .exercises
                .iter()
                .position(|exercise| !answered.contains_key(&exercise.id));
            topic.next_exercise_index = match next {
                Some(index) if answered.len() < topic.exercises.len() => index,
                _ => 0,
            };
            topic.answered_total = answered.len();
            topic.answered = answered;
            Ok(topic)
        })
    }

    async fn validate_answer(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<ValidationResult, ApiError> {
        self.call(RecordedCall::ValidateAnswer(submission.clone()), |state| {
            state.require_user()?;
            let (topic_id, exercise) = state
                .topics
                .values()
                .find_map(|topic| {
                    topic
                        .exercises
                        .iter()
                        .find(|exercise| exercise.id == submission.exercise_id)
                        .map(|exercise| (topic.id, exercise.clone()))
                })
                .ok_or(ApiError::NotFound)?;

            let responses = state.responses.entry(topic_id).or_default();
            let correct = match responses.get(&exercise.id) {
                Some(previous) => previous.correct,
                None => {
                    let correct = state.solutions.get(&exercise.id).is_some_and(|solution| {
                        solution.trim().to_lowercase() == submission.answer.trim().to_lowercase()
                    });
                    responses.insert(
                        exercise.id,
                        PriorAnswer {
                            answer: submission.answer.clone(),
                            correct,
                            used_hint: submission.used_hint,
                        },
                    );
                    correct
                }
            };
            Ok(ValidationResult {
                correct,
                feedback: exercise.feedback_for(correct),
            })
        })
    }

    async fn finalize_topic(&self, id: TopicId) -> Result<FinalizeOutcome, ApiError> {
        self.call(RecordedCall::FinalizeTopic(id), |state| {
            state.require_user()?;
            let total = state
                .topics
                .get(&id)
                .map(|topic| topic.exercises.len())
                .ok_or(ApiError::NotFound)?;
            let lesson_index = state.lesson_of(id).ok_or(ApiError::NotFound)?;
            let correct = state
                .responses
                .get(&id)
                .map_or(0, |answers| answers.values().filter(|a| a.correct).count());
            let accuracy = if total > 0 {
                correct as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            let passed = accuracy >= PASS_PERCENT;

            let attempt = state.attempts.entry(id).or_default();
            attempt.count += 1;
            let improvement = attempt.last_accuracy.map(|previous| accuracy - previous);
            attempt.last_accuracy = Some(accuracy);
            let attempt_number = attempt.count;

            let lesson = &mut state.lessons[lesson_index];
            let mut position = 0;
            for topic in &mut lesson.topics {
                if topic.id == id {
                    position = topic.position;
                    let progress = topic.progress.get_or_insert_with(TopicProgress::default);
                    progress.accuracy = accuracy;
                    progress.attempts = attempt_number;
                    progress.unlocked = true;
                    if passed {
                        progress.status = TopicStatus::Completed;
                    }
                }
            }

            let mut next_topic_id = None;
            if passed {
                if let Some(next) = lesson
                    .topics
                    .iter_mut()
                    .find(|topic| topic.position == position + 1)
                {
                    next.progress
                        .get_or_insert_with(TopicProgress::default)
                        .unlocked = true;
                    next_topic_id = Some(next.id);
                }
                let completed = lesson
                    .topics
                    .iter()
                    .filter(|topic| topic.status() == TopicStatus::Completed)
                    .count();
                if !lesson.topics.is_empty() {
                    lesson.progress.percent_complete =
                        completed as f64 / lesson.topics.len() as f64 * 100.0;
                }
                if completed == lesson.topics.len() {
                    lesson.progress.status = LessonStatus::Completed;
                    lesson.progress.completed = Some(true);
                }
            }

            Ok(FinalizeOutcome {
                passed,
                accuracy,
                correct_count: u32::try_from(correct).ok(),
                total_count: u32::try_from(total).ok(),
                lesson_id: lesson.id,
                topic_id: Some(id),
                next_topic_id,
                attempt: attempt_number,
                improvement,
            })
        })
    }

    async fn retry_topic(&self, id: TopicId) -> Result<(), ApiError> {
        self.call(RecordedCall::RetryTopic(id), |state| {
            state.require_user()?;
            if !state.topics.contains_key(&id) {
                return Err(ApiError::NotFound);
            }
            state.responses.remove(&id);
            Ok(())
        })
    }

    async fn return_to_topic(&self, id: TopicId) -> Result<(), ApiError> {
        self.call(RecordedCall::ReturnToTopic(id), |state| {
            state.require_user()?;
            if state.topics.contains_key(&id) {
                Ok(())
            } else {
                Err(ApiError::NotFound)
            }
        })
    }
}

#[async_trait]
impl TrackingGateway for InMemoryBackend {
    async fn start_activity(
        &self,
        screen: ScreenKind,
        context: ActivityContext,
    ) -> Result<ActivityId, ApiError> {
        self.call(RecordedCall::StartActivity(screen, context), |state| {
            state.require_tracking()?;
            let id = ActivityId::new(state.next_id());
            state.activities.push(ActivityRecord {
                id,
                screen,
                lesson_id: context.lesson_id,
                topic_id: context.topic_id,
                exercise_id: context.exercise_id,
                started_at: None,
                seconds: 0,
                back_navigations: 0,
            });
            state.open_activities.insert(id);
            Ok(id)
        })
    }

    async fn end_activity(&self, id: ActivityId) -> Result<(), ApiError> {
        self.call(RecordedCall::EndActivity(id), |state| {
            state.require_tracking()?;
            if state.open_activities.remove(&id) {
                Ok(())
            } else {
                Err(ApiError::NotFound)
            }
        })
    }

    async fn start_study_session(&self) -> Result<StudySessionId, ApiError> {
        self.call(RecordedCall::StartStudySession, |state| {
            state.require_tracking()?;
            let id = StudySessionId::new(state.next_id());
            state.open_sessions.insert(id);
            Ok(id)
        })
    }

    async fn end_study_session(&self, id: StudySessionId) -> Result<(), ApiError> {
        self.call(RecordedCall::EndStudySession(id), |state| {
            state.require_tracking()?;
            if state.open_sessions.remove(&id) {
                Ok(())
            } else {
                Err(ApiError::NotFound)
            }
        })
    }

    async fn list_activities(&self) -> Result<Vec<ActivityRecord>, ApiError> {
        self.call(RecordedCall::ListActivities, |state| {
            state.require_tracking()?;
            Ok(state.activities.iter().rev().cloned().collect())
        })
    }

    async fn register_content_back(&self, id: ActivityId) -> Result<(), ApiError> {
        self.call(RecordedCall::ContentBack(id), |state| {
            state.require_tracking()?;
            let record = state
                .activities
                .iter_mut()
                .find(|record| record.id == id)
                .ok_or(ApiError::NotFound)?;
            record.back_navigations += 1;
            Ok(())
        })
    }
}
