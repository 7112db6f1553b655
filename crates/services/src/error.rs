//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{LessonError, UserId};
use quiz_core::scoring::ScoringError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the quiz session engine.
///
/// Every variant except `EmptyLesson`/`TooManyQuestions` is a rejected
/// call: the session state is left exactly as it was.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("lesson has no questions and cannot be played")]
    EmptyLesson,
    #[error("lesson has too many questions ({0})")]
    TooManyQuestions(usize),
    #[error("session already completed")]
    Completed,
    #[error("answers can only be chosen while a question is open")]
    NotAnswering,
    #[error("no answer result is being shown")]
    NotShowingResult,
    #[error("no answer selected")]
    NoAnswerSelected,
    #[error("answer {index} is out of range for {len} answers")]
    AnswerOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// Errors emitted by `LessonService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonServiceError {
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid lesson JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("no user record for {0}")]
    UnknownUser(UserId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Reasons the app cannot get past its loading screen.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccessError {
    #[error("no user id was supplied")]
    MissingIdentity,
    #[error("user {0} not found")]
    UnknownUser(UserId),
    #[error("failed to load data: {0}")]
    LoadFailed(#[source] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
