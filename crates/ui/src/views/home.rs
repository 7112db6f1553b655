use std::time::Duration;

use dioxus::prelude::*;

use crate::context::AppContext;
use crate::controller::QuizApp;
use crate::intent::Intent;
use crate::mode::AppMode;
use crate::views::{
    AdminView, HeaderBar, LessonListView, ModeSelectView, QuizView, ResultsView, ViewError,
    ViewState, view_state_from_resource,
};
use crate::vm::{
    HeaderVm, LessonCardVm, LessonFormVm, QuizScreenVm, ResultsVm, map_header, map_lesson_cards,
};

/// What the current mode draws, detached from the app so it can be passed as props.
#[derive(Clone, Debug, PartialEq)]
enum Screen {
    ModeSelection { user_name: String },
    LessonList { cards: Vec<LessonCardVm> },
    Quiz(QuizScreenVm),
    Results { results: ResultsVm, show_home: bool },
    Admin {
        lessons: Vec<LessonCardVm>,
        form: Option<LessonFormVm>,
    },
}

impl Screen {
    fn of(app: &QuizApp) -> Self {
        let profile = app.profile();
        match app.mode() {
            AppMode::ModeSelection => Screen::ModeSelection {
                user_name: profile.name.clone(),
            },
            AppMode::LessonList => Screen::LessonList {
                cards: map_lesson_cards(app.lessons(), profile),
            },
            AppMode::Quiz(vm) => Screen::Quiz(vm.screen()),
            AppMode::ResultsDisplay(results) => Screen::Results {
                results: results.clone(),
                show_home: profile.admin,
            },
            AppMode::AdminConsole { form } => Screen::Admin {
                lessons: map_lesson_cards(app.lessons(), profile),
                form: form.clone(),
            },
        }
    }

    fn shows_header(&self) -> bool {
        !matches!(self, Screen::ModeSelection { .. } | Screen::Admin { .. })
    }
}

/// The single screen host. Owns the `QuizApp` and feeds it intents and fired timers.
#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let app = use_signal(|| None::<QuizApp>);
    let error = use_signal(|| None::<ViewError>);

    let resource = {
        let ctx = ctx.clone();
        use_resource(move || {
            let ctx = ctx.clone();
            let mut app = app;
            async move {
                let bootstrap = ctx.bootstrap().await.map_err(|err| {
                    tracing::error!(error = %err, "startup failed");
                    ViewError::from(&err)
                })?;
                app.set(Some(QuizApp::new(ctx, bootstrap)));
                Ok::<_, ViewError>(())
            }
        })
    };

    let inbox = ctx.advance_signals();
    use_hook(move || {
        let mut app = app;
        let mut error = error;
        spawn(async move {
            while let Some(signal) = inbox.recv().await {
                // The app is out on loan while an intent is handled.
                while app.peek().is_none() {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
                let outcome = app
                    .write()
                    .as_mut()
                    .map_or(Ok(()), |current| current.on_advance(signal));
                if let Err(err) = outcome {
                    error.set(Some(err));
                }
            }
        })
    });

    let dispatch = use_callback(move |intent: Intent| {
        let mut app = app;
        let mut error = error;
        spawn(async move {
            let taken = app.write().take();
            let Some(mut current) = taken else {
                error.set(Some(ViewError::Unknown));
                return;
            };

            let outcome = current.handle(intent).await;

            // Always put the app back so the UI remains usable even after errors.
            app.set(Some(current));
            error.set(outcome.err());
        });
    });

    let state = view_state_from_resource(&resource);
    let snapshot = app
        .read()
        .as_ref()
        .map(|current| {
            let header = map_header(current.profile(), current.lessons());
            let notice = current.notice().map(str::to_owned);
            (Screen::of(current), header, notice)
        });

    rsx! {
        div { class: "page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { class: "loading", "Loading your learning journey..." }
                },
                ViewState::Error(err) => rsx! {
                    ErrorPanel { error: err }
                },
                ViewState::Ready(()) => match (snapshot, error()) {
                    (_, Some(err)) if err.is_fatal() => rsx! {
                        ErrorPanel { error: err }
                    },
                    (None, _) => rsx! {
                        p { class: "loading", "Working..." }
                    },
                    (Some((screen, header, notice)), err) => rsx! {
                        ScreenHost { screen, header, notice, error: err, on_intent: dispatch }
                    },
                },
            }
        }
    }
}

#[component]
fn ErrorPanel(error: ViewError) -> Element {
    rsx! {
        div { class: "error",
            h2 { "Something went wrong" }
            p { "{error.message()}" }
        }
    }
}

#[component]
fn ScreenHost(
    screen: Screen,
    header: HeaderVm,
    notice: Option<String>,
    error: Option<ViewError>,
    on_intent: EventHandler<Intent>,
) -> Element {
    rsx! {
        if screen.shows_header() {
            HeaderBar { header }
        }
        if let Some(err) = error {
            p { class: "banner banner--error", "{err.message()}" }
        }
        if let Some(notice) = notice {
            p { class: "banner banner--notice", "{notice}" }
        }
        main { class: "content",
            match screen {
                Screen::ModeSelection { user_name } => rsx! {
                    ModeSelectView { user_name, on_intent }
                },
                Screen::LessonList { cards } => rsx! {
                    LessonListView { cards, on_intent }
                },
                Screen::Quiz(screen) => rsx! {
                    QuizView { screen, on_intent }
                },
                Screen::Results { results, show_home } => rsx! {
                    ResultsView { results, show_home, on_intent }
                },
                Screen::Admin { lessons, form } => rsx! {
                    AdminView { lessons, form, on_intent }
                },
            }
        }
    }
}
