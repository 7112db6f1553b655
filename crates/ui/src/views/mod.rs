mod admin;
mod home;
mod lessons;
mod mode_select;
mod quiz;
mod results;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use admin::AdminView;
pub use home::HomeView;
pub use lessons::{HeaderBar, LessonListView};
pub use mode_select::ModeSelectView;
pub use quiz::QuizView;
pub use results::ResultsView;
pub use state::{ViewError, ViewState, view_state_from_resource};
