#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod lesson_service;
pub mod progress_service;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::{AppServices, Bootstrap};
pub use error::{AccessError, AppServicesError, LessonServiceError, ProgressError, SessionError};
pub use lesson_service::LessonService;
pub use progress_service::ProgressService;
pub use sessions::{
    ActiveQuiz, AdvanceOutcome, AdvanceSignal, AnswerFeedback, QuizLoopService, QuizPhase,
    QuizResult, QuizSession, QuizSettings, SessionProgress,
};
