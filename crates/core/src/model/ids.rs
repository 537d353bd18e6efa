use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing an ID from a string (route params, map keys).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

macro_rules! backend_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the underlying backend primary key.
            #[must_use]
            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u64>()
                    .map(Self::new)
                    .map_err(|_| ParseIdError {
                        kind: stringify!($name),
                    })
            }
        }
    };
}

backend_id!(
    /// Identifier of a registered student.
    UserId
);
backend_id!(
    /// Identifier of a lesson (`leccion`).
    LessonId
);
backend_id!(
    /// Identifier of a topic (`tema`) inside a lesson.
    TopicId
);
backend_id!(
    /// Identifier of a content slide (`contenido`) inside a topic.
    ContentId
);
backend_id!(
    /// Identifier of an exercise (`ejercicio`) inside a topic.
    ExerciseId
);
backend_id!(
    /// Identifier of a tracked screen visit.
    ActivityId
);
backend_id!(
    /// Identifier of a login-to-logout study session.
    StudySessionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_id_display() {
        let id = LessonId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{id:?}"), "LessonId(42)");
    }

    #[test]
    fn topic_id_from_str() {
        let id: TopicId = "123".parse().unwrap();
        assert_eq!(id, TopicId::new(123));
    }

    #[test]
    fn exercise_id_from_str_invalid() {
        let err = "not-a-number".parse::<ExerciseId>().unwrap_err();
        assert_eq!(err.to_string(), "failed to parse ExerciseId from string");
    }

    #[test]
    fn ids_serialize_as_bare_numbers() {
        let json = serde_json::to_string(&ActivityId::new(7)).unwrap();
        assert_eq!(json, "7");
        let parsed: StudySessionId = serde_json::from_str("9").unwrap();
        assert_eq!(parsed.value(), 9);
    }
}
