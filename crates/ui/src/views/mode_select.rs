use dioxus::prelude::*;

use crate::intent::Intent;
use crate::mode::ModeChoice;

#[component]
pub fn ModeSelectView(user_name: String, on_intent: EventHandler<Intent>) -> Element {
    rsx! {
        div { class: "mode-select",
            p { class: "welcome", "Welcome, {user_name}" }
            h2 { "Choose Your Mode" }
            div { class: "mode-select__grid",
                for (index, choice) in ModeChoice::ALL.into_iter().enumerate() {
                    button {
                        key: "{index}",
                        class: "mode-card",
                        r#type: "button",
                        onclick: move |_| on_intent.call(Intent::Choose(index + 1)),
                        span { class: "mode-card__label", "{choice.label()}" }
                        span { class: "mode-card__hint", "{choice.hint()}" }
                    }
                }
            }
        }
    }
}
