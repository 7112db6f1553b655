use std::sync::Arc;
use std::time::Duration;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::{UserId, UserProfile};
use quiz_core::time::fixed_clock;
use services::{AppServices, QuizSettings};
use storage::repository::{InMemoryRepository, Storage, UserRepository};

use crate::context::{AdvanceInbox, UiApp, build_app_context};
use crate::intent::Intent;
use crate::views::{AdminView, HomeView, LessonListView, QuizView, ResultsView};
use crate::vm::{LessonCardVm, LessonFormVm, QuizScreenVm, ResultsVm};

struct TestApp {
    user_id: Option<UserId>,
    services: AppServices,
    advance: AdvanceInbox,
}

impl UiApp for TestApp {
    fn user_id(&self) -> Option<UserId> {
        self.user_id.clone()
    }

    fn services(&self) -> AppServices {
        self.services.clone()
    }

    fn advance_signals(&self) -> AdvanceInbox {
        self.advance.clone()
    }
}

#[derive(Props, Clone)]
struct HomeHarnessProps {
    app: Arc<TestApp>,
}

impl PartialEq for HomeHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn HomeRouterHarness(props: HomeHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    rsx! { HomeView {} }
}

/// A leaf screen rendered from a fixed view model.
#[derive(Clone, PartialEq)]
pub enum ScreenKind {
    Lessons(Vec<LessonCardVm>),
    Quiz(QuizScreenVm),
    Results(ResultsVm),
    Admin {
        lessons: Vec<LessonCardVm>,
        form: Option<LessonFormVm>,
    },
}

#[component]
fn ScreenHarness(screen: ScreenKind) -> Element {
    let on_intent = use_callback(|_: Intent| {});
    match screen {
        ScreenKind::Lessons(cards) => rsx! { LessonListView { cards, on_intent } },
        ScreenKind::Quiz(screen) => rsx! { QuizView { screen, on_intent } },
        ScreenKind::Results(results) => rsx! {
            ResultsView { results, show_home: false, on_intent }
        },
        ScreenKind::Admin { lessons, form } => rsx! { AdminView { lessons, form, on_intent } },
    }
}

pub fn render_screen(screen: ScreenKind) -> String {
    let mut dom = VirtualDom::new_with_props(ScreenHarness, ScreenHarnessProps { screen });
    dom.rebuild_in_place();
    drive_dom(&mut dom);
    dioxus_ssr::render(&dom)
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(Duration::from_millis(50), self.dom.wait_for_work()).await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let the bootstrap resource settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// A `HomeView` over in-memory storage. `profile` is stored first when given;
/// `user_id` is the identity the app is launched with.
pub async fn setup_home_harness(
    repo: InMemoryRepository,
    profile: Option<UserProfile>,
    user_id: Option<UserId>,
) -> ViewHarness {
    if let Some(profile) = profile.as_ref() {
        repo.upsert_user(profile).await.expect("store user");
    }
    let (services, rx) = AppServices::new(
        &Storage::from_in_memory(repo),
        fixed_clock(),
        QuizSettings::default(),
    );
    let app = Arc::new(TestApp {
        user_id,
        services,
        advance: AdvanceInbox::new(rx),
    });
    let dom = VirtualDom::new_with_props(HomeRouterHarness, HomeHarnessProps { app });
    ViewHarness { dom }
}
