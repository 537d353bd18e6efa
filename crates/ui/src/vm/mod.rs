mod auth_vm;
mod finalize_vm;
mod lesson_vm;
mod markup_vm;
mod topic_vm;

pub use auth_vm::{
    AuthErrors, AuthField, AuthForm, AuthMode, AuthRequest, MIN_PASSWORD_LEN, REGISTERED_NOTICE,
    errors_from_failure,
};
pub use finalize_vm::{FinalizeAction, FinalizeDialog, PASS_THRESHOLD_PERCENT, finalize_dialog};
pub use lesson_vm::{
    CardClick, LOCKED_LESSON_NOTICE, LOCKED_TOPIC_NOTICE, LessonCardVm, TopicCardVm,
    map_lesson_cards, map_topic_cards, percent,
};
pub use markup_vm::{render_markup, sanitize_html};
pub use topic_vm::{
    ContentPaneVm, EMPTY_ANSWER_NOTICE, ExercisePaneVm, FINALIZE_ERROR_NOTICE,
    RETRY_ERROR_NOTICE, VALIDATE_ERROR_NOTICE, result_title, screen_for_phase,
};
