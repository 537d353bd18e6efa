#![forbid(unsafe_code)]

pub mod app_services;
pub mod best_effort;
pub mod error;
pub mod lessons;
pub mod session;
pub mod topic_flow;
pub mod tracking;

pub use matelog_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, AuthFailure, LessonError, TopicFlowError};
pub use lessons::{LessonEntry, LessonOverview, LessonService, TopicEntry};
pub use session::{SessionContext, SessionState};
pub use topic_flow::TopicFlowService;
pub use tracking::{ScreenTracker, TrackedScreen};
