use std::path::PathBuf;

use dioxus::prelude::*;

use quiz_core::model::Difficulty;

use crate::intent::Intent;
use crate::vm::{LessonCardVm, LessonFormVm, QuestionFormVm};

const DIFFICULTIES: [Difficulty; 3] = [
    Difficulty::Beginner,
    Difficulty::Intermediate,
    Difficulty::Advanced,
];

#[component]
pub fn AdminView(
    lessons: Vec<LessonCardVm>,
    form: Option<LessonFormVm>,
    on_intent: EventHandler<Intent>,
) -> Element {
    let mut path = use_signal(|| "lessons.json".to_string());
    let editing = form.is_some();
    let form_key = form
        .as_ref()
        .and_then(|f| f.editing.as_ref())
        .map_or_else(|| "new".to_string(), ToString::to_string);

    rsx! {
        div { class: "admin",
            h2 { "Admin Panel" }
            div { class: "admin__toolbar",
                button {
                    class: "btn",
                    r#type: "button",
                    disabled: editing,
                    onclick: move |_| on_intent.call(Intent::NewLesson),
                    "Add New Lesson"
                }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::RefreshLessons),
                    "Refresh"
                }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::Seed),
                    "Load Sample Lessons"
                }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::Home),
                    "Return Home"
                }
            }
            div { class: "admin__files",
                input {
                    class: "admin__path",
                    r#type: "text",
                    value: "{path.read()}",
                    oninput: move |evt| path.set(evt.value()),
                }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::Import(PathBuf::from(path.read().as_str()))),
                    "Import JSON"
                }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::Export(PathBuf::from(path.read().as_str()))),
                    "Export JSON"
                }
            }

            if let Some(form) = form {
                LessonForm {
                    key: "{form_key}",
                    form,
                    on_intent,
                }
            }

            h3 { "Lessons ({lessons.len()})" }
            if lessons.is_empty() {
                p { class: "admin__empty", "No lessons yet. Add one or load the samples." }
            }
            ul { class: "admin__lessons",
                for (index, lesson) in lessons.into_iter().enumerate() {
                    li { key: "{lesson.id}", class: "admin__lesson",
                        span { class: "admin__lesson-title", "{lesson.title}" }
                        span { class: "admin__lesson-meta",
                            "{lesson.category} · {lesson.difficulty} · {lesson.question_count} questions"
                        }
                        button {
                            class: "btn btn--small",
                            r#type: "button",
                            disabled: editing,
                            onclick: move |_| on_intent.call(Intent::EditLesson(index + 1)),
                            "Edit"
                        }
                        button {
                            class: "btn btn--small btn--danger",
                            r#type: "button",
                            disabled: editing,
                            onclick: move |_| on_intent.call(Intent::Delete(index + 1)),
                            "Delete"
                        }
                    }
                }
            }
        }
    }
}

/// Add/edit form. Edits stay local until saved.
#[component]
fn LessonForm(form: LessonFormVm, on_intent: EventHandler<Intent>) -> Element {
    let mut draft = use_signal(|| form.clone());
    let current = draft.read().clone();

    rsx! {
        section { class: "lesson-form",
            h3 { "{current.heading()}" }
            label { "Title" }
            input {
                r#type: "text",
                value: "{current.title}",
                oninput: move |evt| draft.write().title = evt.value(),
            }
            label { "Description" }
            textarea {
                rows: 3,
                value: "{current.description}",
                oninput: move |evt| draft.write().description = evt.value(),
            }
            label { "Category" }
            input {
                r#type: "text",
                value: "{current.category}",
                oninput: move |evt| draft.write().category = evt.value(),
            }
            label { "Difficulty" }
            select {
                value: "{current.difficulty}",
                onchange: move |evt| {
                    if let Ok(difficulty) = evt.value().parse::<Difficulty>() {
                        draft.write().difficulty = difficulty;
                    }
                },
                for difficulty in DIFFICULTIES {
                    option {
                        key: "{difficulty}",
                        value: "{difficulty}",
                        selected: difficulty == current.difficulty,
                        "{difficulty}"
                    }
                }
            }

            for (index, question) in current.questions.iter().cloned().enumerate() {
                QuestionFields {
                    key: "{index}",
                    index,
                    question,
                    can_remove: current.questions.len() > 1,
                    draft,
                }
            }

            div { class: "lesson-form__actions",
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| draft.write().add_question(),
                    "Add Question"
                }
                button {
                    class: "btn btn--primary",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::SaveLesson(draft.read().clone())),
                    "{current.save_label()}"
                }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::CancelEdit),
                    "Cancel"
                }
            }
        }
    }
}

#[component]
fn QuestionFields(
    index: usize,
    question: QuestionFormVm,
    can_remove: bool,
    draft: Signal<LessonFormVm>,
) -> Element {
    let mut draft = draft;
    let number = index + 1;
    let group = format!("correct-{index}");

    rsx! {
        fieldset { class: "lesson-form__question",
            legend { "Question {number}" }
            textarea {
                rows: 2,
                value: "{question.prompt}",
                oninput: move |evt| {
                    if let Some(q) = draft.write().questions.get_mut(index) {
                        q.prompt = evt.value();
                    }
                },
            }
            for (slot, answer) in question.answers.iter().cloned().enumerate() {
                AnswerField {
                    key: "{slot}",
                    question: index,
                    slot,
                    text: answer,
                    group: group.clone(),
                    correct: question.correct_answer == slot,
                    draft,
                }
            }
            button {
                class: "btn btn--small",
                r#type: "button",
                disabled: !can_remove,
                onclick: move |_| draft.write().remove_question(index),
                "Remove Question"
            }
        }
    }
}

#[component]
fn AnswerField(
    question: usize,
    slot: usize,
    text: String,
    group: String,
    correct: bool,
    draft: Signal<LessonFormVm>,
) -> Element {
    let mut draft = draft;
    let placeholder = format!("Answer {}", slot + 1);

    rsx! {
        div { class: "lesson-form__answer",
            input {
                r#type: "radio",
                name: "{group}",
                checked: correct,
                onchange: move |_| {
                    if let Some(q) = draft.write().questions.get_mut(question) {
                        q.correct_answer = slot;
                    }
                },
            }
            input {
                r#type: "text",
                placeholder: "{placeholder}",
                value: "{text}",
                oninput: move |evt| {
                    if let Some(answer) = draft
                        .write()
                        .questions
                        .get_mut(question)
                        .and_then(|q| q.answers.get_mut(slot))
                    {
                        *answer = evt.value();
                    }
                },
            }
        }
    }
}
