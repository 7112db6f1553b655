pub mod app;
pub mod context;
pub mod controller;
pub mod intent;
pub mod mode;
pub mod routes;
pub mod vm;
pub mod views;

pub use app::App;
pub use context::{AdvanceInbox, AppContext, UiApp, build_app_context};
pub use controller::QuizApp;
pub use intent::Intent;
pub use mode::{AppMode, ModeChoice};
pub use views::ViewError;
