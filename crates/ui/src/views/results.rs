use dioxus::prelude::*;

use crate::intent::Intent;
use crate::vm::ResultsVm;

/// `show_home` is only set for admins, who came from mode selection.
#[component]
pub fn ResultsView(results: ResultsVm, show_home: bool, on_intent: EventHandler<Intent>) -> Element {
    rsx! {
        div { class: "results",
            p { class: "results__lesson", "{results.lesson_title}" }
            h2 { "{results.title()}" }
            p { class: "results__message", "{results.message()}" }
            div { class: "results__score",
                div { class: "results__percentage", "{results.percentage}%" }
                div { "{results.score_line()}" }
            }
            div { class: "results__actions",
                button {
                    class: "submit-btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::BackToLessons),
                    "Back to Lessons"
                }
                if show_home {
                    button {
                        class: "submit-btn",
                        r#type: "button",
                        onclick: move |_| on_intent.call(Intent::Home),
                        "Return Home"
                    }
                }
            }
        }
    }
}
