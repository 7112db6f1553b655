use dioxus::prelude::*;

use crate::intent::Intent;
use crate::vm::{HeaderVm, LessonCardVm};

/// Name, overall progress, and completed count; shown on learner screens.
#[component]
pub fn HeaderBar(header: HeaderVm) -> Element {
    let overall = header.overall_progress;
    rsx! {
        header { class: "app-header",
            div { class: "progress-bar",
                div { class: "progress-fill", style: "width: {overall}%" }
            }
            span { class: "overall", "Overall Progress: {overall}%" }
            span { class: "completed", "Lessons completed: {header.lessons_completed}" }
            span { class: "welcome", "Welcome, {header.user_name}" }
        }
    }
}

#[component]
pub fn LessonListView(
    cards: Vec<LessonCardVm>,
    on_intent: EventHandler<Intent>,
) -> Element {
    rsx! {
        div { class: "lesson-list",
            h2 { "Choose Your Learning Path" }
            p { class: "lesson-list__intro",
                "Master new topics through interactive quizzes and track your progress along the way."
            }
            if cards.is_empty() {
                p { class: "error", "No lessons available yet." }
            } else {
                div { class: "lessons-grid",
                    for (index, card) in cards.into_iter().enumerate() {
                        LessonCard { key: "{card.id}", number: index + 1, card, on_intent }
                    }
                }
            }
        }
    }
}

#[component]
fn LessonCard(number: usize, card: LessonCardVm, on_intent: EventHandler<Intent>) -> Element {
    let class = if card.completed {
        "lesson-card lesson-card--completed"
    } else {
        "lesson-card"
    };
    let progress = card.progress;
    rsx! {
        div { class: "{class}",
            h3 { class: "lesson-title", "{card.title}" }
            p { class: "lesson-description", "{card.description}" }
            p { class: "lesson-meta",
                "{card.category} · {card.difficulty} · {card.question_count} questions"
            }
            span { class: "progress-text", "Progress: {progress}%" }
            div { class: "lesson-progress-bar",
                div { class: "lesson-progress-fill", style: "width: {progress}%" }
            }
            button {
                class: "start-lesson-btn",
                r#type: "button",
                onclick: move |_| on_intent.call(Intent::Choose(number)),
                "{card.action.label()}"
            }
        }
    }
}
