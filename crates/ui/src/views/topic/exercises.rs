use dioxus::prelude::*;
use dioxus_router::use_navigator;
use matelog_core::flow::{ExerciseStep, FlowError, TopicFlow, Transition};
use matelog_core::model::{ChoiceOption, Exercise, ExerciseId, ExerciseKind, ValidationResult};

use crate::context::{AppContext, use_session_handle};
use crate::views::common::Markup;
use crate::vm::{
    EMPTY_ANSWER_NOTICE, ExercisePaneVm, FINALIZE_ERROR_NOTICE, FinalizeDialog,
    VALIDATE_ERROR_NOTICE, finalize_dialog, result_title,
};

use super::report_failure;

#[derive(Clone)]
struct ExerciseSnapshot {
    vm: ExercisePaneVm,
    exercise: Exercise,
    answer: String,
    result: Option<ValidationResult>,
    help_visible: bool,
    automatic_hint: bool,
}

impl ExerciseSnapshot {
    fn capture(flow: &TopicFlow) -> Option<Self> {
        let vm = ExercisePaneVm::from_flow(flow)?;
        let exercise = flow.current_exercise()?.clone();
        Some(Self {
            answer: flow.answer(exercise.id).unwrap_or_default().to_string(),
            result: flow.result(exercise.id).cloned(),
            help_visible: flow.is_help_visible(exercise.id),
            automatic_hint: flow.shows_automatic_hint(&exercise),
            vm,
            exercise,
        })
    }
}

#[component]
pub(crate) fn ExercisePane(
    flow: Signal<Option<TopicFlow>>,
    busy: Signal<bool>,
    notice: Signal<Option<String>>,
    dialog: Signal<Option<FinalizeDialog>>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session_handle();
    let navigator = use_navigator();
    let mut flow = flow;
    let mut busy = busy;
    let mut notice = notice;
    let mut dialog = dialog;

    let (snapshot, topic_id, can_return) = {
        let guard = flow.read();
        let Some(current) = guard.as_ref() else {
            return rsx! {};
        };
        (
            ExerciseSnapshot::capture(current),
            current.topic_id(),
            current.can_return_to_content(),
        )
    };

    let back_to_topic = {
        let ctx = ctx.clone();
        move |_| {
            let transition = flow.with_mut(|state| state.as_mut().map(TopicFlow::back_to_topic));
            if !matches!(transition, Some(Transition::Moved(_))) {
                return;
            }
            let topics = ctx.topics();
            spawn(async move {
                topics.notify_return_to_topic(topic_id).await;
            });
        }
    };

    let Some(snapshot) = snapshot else {
        return rsx! {
            div { class: "exercises-section",
                header { class: "exercises-header",
                    if can_return {
                        button { class: "btn-back", r#type: "button", onclick: back_to_topic,
                            "← Volver al Tema"
                        }
                    } else {
                        button {
                            class: "btn-back",
                            r#type: "button",
                            onclick: move |_| navigator.go_back(),
                            "← Salir"
                        }
                    }
                }
                p { class: "empty-state", "No hay ejercicios disponibles en este tema." }
            }
        };
    };

    let exercise_id = snapshot.exercise.id;
    let answered = snapshot.result.is_some();
    let vm = snapshot.vm.clone();

    let submit = {
        let ctx = ctx.clone();
        move |_| {
            if busy() {
                return;
            }
            let prepared = flow.read().as_ref().map(TopicFlow::submission);
            let submission = match prepared {
                Some(Ok(submission)) => submission,
                Some(Err(FlowError::EmptyAnswer)) => {
                    notice.set(Some(EMPTY_ANSWER_NOTICE.to_string()));
                    return;
                }
                Some(Err(error)) => {
                    tracing::debug!(error = %error, "submission refused");
                    return;
                }
                None => return,
            };
            busy.set(true);
            let ctx = ctx.clone();
            spawn(async move {
                match ctx.topics().validate(&submission).await {
                    Ok(result) => flow.with_mut(|state| {
                        let Some(current) = state.as_mut() else {
                            return;
                        };
                        if let Err(error) = current.record_result(submission.exercise_id, result) {
                            tracing::warn!(error = %error, "validation result dropped");
                        }
                    }),
                    Err(error) => report_failure(&ctx, session, notice, error, VALIDATE_ERROR_NOTICE),
                }
                busy.set(false);
            });
        }
    };

    let next = {
        let ctx = ctx.clone();
        move |_| {
            let step = flow.with_mut(|state| state.as_mut().map(TopicFlow::next_exercise));
            match step {
                Some(Ok(ExerciseStep::Finalize)) => {
                    let Some(current) = flow.read().clone() else {
                        return;
                    };
                    busy.set(true);
                    let ctx = ctx.clone();
                    spawn(async move {
                        match ctx.topics().finalize(&current).await {
                            Ok(outcome) => dialog.set(Some(finalize_dialog(&outcome))),
                            Err(error) => {
                                report_failure(&ctx, session, notice, error, FINALIZE_ERROR_NOTICE);
                            }
                        }
                        busy.set(false);
                    });
                }
                Some(Ok(ExerciseStep::Advanced(index))) => {
                    tracing::debug!(index, "next exercise");
                }
                Some(Err(error)) => tracing::debug!(error = %error, "next exercise refused"),
                None => {}
            }
        }
    };

    let toggle_help = move |_| {
        flow.with_mut(|state| {
            if let Some(current) = state.as_mut() {
                current.toggle_help(exercise_id);
            }
        });
    };

    let exercise = snapshot.exercise.clone();
    let hint = exercise.hint().map(str::to_string);
    let is_busy = busy();

    rsx! {
        div { class: "exercises-section",
            header { class: "exercises-header",
                if vm.show_return {
                    button { class: "btn-back", r#type: "button", onclick: back_to_topic,
                        "← Volver al Tema"
                    }
                }
                h1 { "{vm.heading}" }
            }

            div { class: "exercise-card",
                div { class: "exercise-header",
                    span { class: "exercise-number", "{vm.number_label}" }
                    if let Some(difficulty) = vm.difficulty.clone() {
                        span { class: "difficulty-badge", "{difficulty}" }
                    }
                }

                if !exercise.instruction.trim().is_empty() {
                    p { class: "exercise-instruction", "{exercise.instruction}" }
                }
                Markup { text: exercise.statement.clone(), class: "exercise-statement" }

                match exercise.kind {
                    ExerciseKind::MultipleChoice => rsx! {
                        div { class: "options",
                            for option in exercise.options.clone() {
                                ChoiceInput {
                                    key: "{option.letter}",
                                    flow,
                                    exercise_id,
                                    option: option.clone(),
                                    checked: snapshot.answer == option.letter,
                                    disabled: answered,
                                }
                            }
                        }
                    },
                    ExerciseKind::Open => rsx! {
                        input {
                            class: "answer-input",
                            r#type: "text",
                            placeholder: "Tu respuesta...",
                            value: "{snapshot.answer}",
                            disabled: answered,
                            oninput: move |evt| {
                                flow.with_mut(|state| {
                                    if let Some(current) = state.as_mut() {
                                        current.answer_change(exercise_id, evt.value());
                                    }
                                });
                            },
                        }
                    },
                }

                if !answered && exercise.has_hint() {
                    button { class: "btn btn-help", r#type: "button", onclick: toggle_help,
                        "{vm.help_label}"
                    }
                }
                if snapshot.help_visible {
                    if let Some(text) = hint.clone() {
                        div { class: "help-box", "{text}" }
                    }
                }

                match snapshot.result.clone() {
                    None => rsx! {
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: is_busy,
                            onclick: submit,
                            "Enviar Respuesta"
                        }
                    },
                    Some(result) => rsx! {
                        div { class: if result.correct { "result-box correct" } else { "result-box incorrect" },
                            h3 { "{result_title(result.correct)}" }
                            if snapshot.automatic_hint {
                                if let Some(text) = hint.clone() {
                                    div { class: "help-box auto-help",
                                        strong { "💡 Ayuda:" }
                                        " {text}"
                                    }
                                }
                            }
                            if let Some(feedback) = result.feedback.clone() {
                                p { class: "feedback", "{feedback}" }
                            }
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                disabled: is_busy,
                                onclick: next,
                                "{vm.next_label}"
                            }
                        }
                    },
                }
            }

            p { class: "exercise-progress", "{vm.progress}" }
        }
    }
}

#[component]
fn ChoiceInput(
    flow: Signal<Option<TopicFlow>>,
    exercise_id: ExerciseId,
    option: ChoiceOption,
    checked: bool,
    disabled: bool,
) -> Element {
    let mut flow = flow;
    let letter = option.letter.clone();
    rsx! {
        label { class: if checked { "option selected" } else { "option" },
            input {
                r#type: "radio",
                name: "answer-{exercise_id}",
                value: "{option.letter}",
                checked,
                disabled,
                onchange: move |_| {
                    let letter = letter.clone();
                    flow.with_mut(|state| {
                        if let Some(current) = state.as_mut() {
                            current.answer_change(exercise_id, letter);
                        }
                    });
                },
            }
            span { "{option.letter}. {option.text}" }
        }
    }
}
