use dioxus::prelude::*;
use services::AccessError;

/// Failures the user gets to see. Details go to the log, not the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    MissingIdentity,
    AccessDenied,
    LoadFailed,
    EmptyLesson,
    NoLessons,
    InvalidChoice,
    InvalidLesson,
    NotAvailable,
    AdminActionFailed,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::MissingIdentity => {
                "No user id given. Start with --uid <id> or set QUIZ_UID."
            }
            ViewError::AccessDenied => "Access denied. User not found in the system.",
            ViewError::LoadFailed => {
                "Failed to load data. Please check your database configuration or user permissions."
            }
            ViewError::EmptyLesson => "No questions available for this lesson.",
            ViewError::NoLessons => "No lessons available yet.",
            ViewError::InvalidChoice => "That is not one of the options.",
            ViewError::InvalidLesson => {
                "A lesson needs a title, and every question needs text and four answers."
            }
            ViewError::NotAvailable => "That action is not available here.",
            ViewError::AdminActionFailed => "The admin action failed. See the log for details.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }

    /// Identity failures end the session; anything else is shown as a banner.
    #[must_use]
    pub fn is_fatal(self) -> bool {
        matches!(self, ViewError::MissingIdentity | ViewError::AccessDenied)
    }
}

impl From<&AccessError> for ViewError {
    fn from(err: &AccessError) -> Self {
        match err {
            AccessError::MissingIdentity => ViewError::MissingIdentity,
            AccessError::UnknownUser(_) => ViewError::AccessDenied,
            AccessError::LoadFailed(_) => ViewError::LoadFailed,
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
