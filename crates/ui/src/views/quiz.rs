use dioxus::prelude::*;

use crate::intent::Intent;
use crate::vm::{AnswerMarker, AnswerRowVm, QuizScreenVm};

#[component]
pub fn QuizView(screen: QuizScreenVm, on_intent: EventHandler<Intent>) -> Element {
    let progress = &screen.progress;
    let filled = progress.question_number * 100 / progress.total.max(1);
    let answering = screen.answering;

    rsx! {
        div { class: "quiz-container",
            h2 { class: "quiz-title", "{screen.lesson_title}" }
            div { class: "progress-bar",
                div { class: "progress-fill", style: "width: {filled}%" }
            }
            div { class: "hearts", "{screen.hearts()}" }
            div { class: "question-counter", "{progress.label()}" }
            div { class: "question", "{screen.prompt}" }
            div { class: "answers-grid",
                for row in screen.answers.clone() {
                    AnswerButton { key: "{row.number}", row, answering, on_intent }
                }
            }
            if let Some(feedback) = screen.feedback.as_ref() {
                p { class: "feedback", "{feedback}" }
            }
            if answering {
                button {
                    class: "submit-btn",
                    r#type: "button",
                    disabled: !screen.can_submit,
                    onclick: move |_| on_intent.call(Intent::Submit),
                    "Submit Answer"
                }
            }
            button {
                class: "link-btn",
                r#type: "button",
                onclick: move |_| on_intent.call(Intent::BackToLessons),
                "Back to Lessons"
            }
        }
    }
}

#[component]
fn AnswerButton(row: AnswerRowVm, answering: bool, on_intent: EventHandler<Intent>) -> Element {
    let class = match row.marker {
        AnswerMarker::Plain => "answer-btn",
        AnswerMarker::Selected => "answer-btn selected",
        AnswerMarker::Correct => "answer-btn correct",
        AnswerMarker::Incorrect => "answer-btn incorrect",
    };
    let number = row.number;
    rsx! {
        button {
            class: "{class}",
            r#type: "button",
            disabled: !answering,
            onclick: move |_| on_intent.call(Intent::Choose(number)),
            "{row.text}"
        }
    }
}
