//! Client-side navigation through one topic: content slides, then exercises.

mod controller;
mod history;

pub use controller::{ExerciseStep, FlowError, Phase, TopicFlow, Transition};
pub use history::{DEFAULT_HISTORY_CAPACITY, NavigationHistory};
