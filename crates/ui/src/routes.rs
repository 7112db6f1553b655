use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::HomeView;

/// Screens switch inside `HomeView` by mode, so there is one route.
#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Outlet::<Route> {}
        }
    }
}
