use std::collections::HashMap;

use matelog_core::RichText;
use matelog_core::model::{
    Age, ChoiceOption, ContentId, ContentItem, ContentKind, Difficulty, Exercise, ExerciseId,
    ExerciseKind, Gender, Group, LessonDetail, LessonId, LessonProgress, Specialty, TopicContent,
    TopicId, TopicSummary, User, UserId,
};

use super::InMemoryBackend;

pub const DEMO_USERNAME: &str = "estudiante";
pub const DEMO_PASSWORD: &str = "matelog1";

impl InMemoryBackend {
    /// A backend with one student account and a small fractions curriculum.
    ///
    /// Lesson 1 has two topics; lesson 2 stays locked until lesson 1 is done.
    #[must_use]
    pub fn demo() -> Self {
        let backend = Self::new();
        backend.add_account(
            User {
                id: UserId::new(1),
                username: DEMO_USERNAME.into(),
                group: Some(Group::A),
                specialty: Some(Specialty::Informatica),
                gender: Some(Gender::Undisclosed),
                age: Some(Age::Sixteen),
            },
            DEMO_PASSWORD,
        );

        backend.add_lesson(lesson(
            1,
            "Fracciones",
            "<p>Suma y resta de fracciones con igual y distinto denominador.</p>",
            vec![
                summary(11, 1, "Igual denominador", 3, 2),
                summary(12, 2, "Distinto denominador", 2, 2),
            ],
        ));
        backend.add_lesson(lesson(
            2,
            "Porcentajes",
            "<p>Cálculo de porcentajes y descuentos.</p>",
            vec![summary(21, 1, "Porcentaje de una cantidad", 1, 1)],
        ));

        backend.add_topic(
            topic(
                11,
                "Igual denominador",
                vec![
                    item(111, ContentKind::Theory, "<p>Si los denominadores son iguales, se suman los numeradores: <strong>a/c + b/c = (a+b)/c</strong>.</p>"),
                    item(112, ContentKind::Example, "<p>1/5 + 2/5 = 3/5</p>"),
                    item(113, ContentKind::ExtraExample, "<p>3/8 + 4/8 = 7/8</p>"),
                ],
                vec![
                    open(1101, 1, "Escribe el resultado como fracción.", "<p>2/7 + 3/7</p>", Some("Suma solo los numeradores.")),
                    multiple(1102, 2, "<p>¿Cuánto es 1/4 + 2/4?</p>", &[("a", "3/8"), ("b", "3/4"), ("c", "2/4")]),
                ],
            ),
            [(ExerciseId::new(1101), "5/7"), (ExerciseId::new(1102), "b")],
        );
        backend.add_topic(
            topic(
                12,
                "Distinto denominador",
                vec![
                    item(121, ContentKind::Theory, "<p>Busca un denominador común antes de sumar.</p>"),
                    item(122, ContentKind::Example, "<p>1/2 + 1/3 = 3/6 + 2/6 = 5/6</p>"),
                ],
                vec![
                    open(1201, 1, "Simplifica si es posible.", "<p>1/2 + 1/4</p>", Some("El denominador común es 4.")),
                    open(1202, 2, "Escribe el resultado como fracción.", "<p>2/3 - 1/6</p>", None),
                ],
            ),
            [(ExerciseId::new(1201), "3/4"), (ExerciseId::new(1202), "1/2")],
        );
        backend.add_topic(
            topic(
                21,
                "Porcentaje de una cantidad",
                vec![item(211, ContentKind::Theory, "<p>El 10% de una cantidad es la cantidad dividida entre 10.</p>")],
                vec![open(2101, 1, "Responde con un número.", "<p>¿Cuánto es el 10% de 250?</p>", None)],
            ),
            [(ExerciseId::new(2101), "25")],
        );
        backend
    }
}

fn lesson(id: u64, title: &str, description: &str, topics: Vec<TopicSummary>) -> LessonDetail {
    LessonDetail {
        id: LessonId::new(id),
        position: u32::try_from(id).unwrap_or(u32::MAX),
        title: title.into(),
        description: RichText::new(description),
        topics,
        progress: LessonProgress::default(),
    }
}

fn summary(id: u64, position: u32, title: &str, contents: u32, exercises: u32) -> TopicSummary {
    TopicSummary {
        id: TopicId::new(id),
        position,
        title: title.into(),
        description: RichText::default(),
        content_count: Some(contents),
        exercise_count: Some(exercises),
        progress: None,
    }
}

fn topic(id: u64, title: &str, contents: Vec<ContentItem>, exercises: Vec<Exercise>) -> TopicContent {
    TopicContent {
        id: TopicId::new(id),
        lesson_id: None,
        position: 1,
        title: title.into(),
        description: RichText::default(),
        contents,
        exercises,
        answered: HashMap::new(),
        next_exercise_index: 0,
        answered_total: 0,
        progress: None,
    }
}

fn item(id: u64, kind: ContentKind, body: &str) -> ContentItem {
    ContentItem {
        id: ContentId::new(id),
        kind,
        kind_label: Some(kind.label().to_string()),
        position: u32::try_from(id % 10).unwrap_or(0),
        body: RichText::new(body),
    }
}

fn open(id: u64, position: u32, instruction: &str, statement: &str, hint: Option<&str>) -> Exercise {
    Exercise {
        id: ExerciseId::new(id),
        position,
        kind: ExerciseKind::Open,
        difficulty: Some(Difficulty::Easy),
        difficulty_label: Some(Difficulty::Easy.label().to_string()),
        show_difficulty: true,
        instruction: instruction.into(),
        statement: RichText::new(statement),
        options: Vec::new(),
        help_text: hint.map(str::to_string),
        has_help: hint.is_some(),
        feedback_correct: Some("¡Muy bien!".into()),
        feedback_incorrect: Some("Revisa el procedimiento.".into()),
    }
}

fn multiple(id: u64, position: u32, statement: &str, options: &[(&str, &str)]) -> Exercise {
    Exercise {
        id: ExerciseId::new(id),
        position,
        kind: ExerciseKind::MultipleChoice,
        difficulty: Some(Difficulty::Intermediate),
        difficulty_label: None,
        show_difficulty: false,
        instruction: "Elige la opción correcta.".into(),
        statement: RichText::new(statement),
        options: options
            .iter()
            .map(|(letter, text)| ChoiceOption {
                letter: (*letter).to_string(),
                text: (*text).to_string(),
            })
            .collect(),
        help_text: None,
        has_help: false,
        feedback_correct: None,
        feedback_incorrect: None,
    }
}
