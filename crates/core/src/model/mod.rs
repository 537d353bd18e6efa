mod answer;
mod ids;
mod lesson;
mod topic;
mod tracking;
mod user;

pub use answer::{AnswerSubmission, FinalizeOutcome, ValidationResult};
pub use ids::{
    ActivityId, ContentId, ExerciseId, LessonId, ParseIdError, StudySessionId, TopicId, UserId,
};
pub use lesson::{
    Lesson, LessonDetail, LessonProgress, LessonStatus, TopicProgress, TopicStatus, TopicSummary,
};
pub use topic::{
    ChoiceOption, ContentItem, ContentKind, Difficulty, Exercise, ExerciseKind, PriorAnswer,
    TopicContent,
};
pub use tracking::{ActivityContext, ActivityRecord, ScreenKind};
pub use user::{Age, Choice, Credentials, Gender, Group, Registration, Specialty, User};
