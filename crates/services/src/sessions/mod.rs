mod progress;
mod service;
mod timer;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{
    AdvanceOutcome, AnswerFeedback, DEFAULT_ADVANCE_DELAY, MAX_LIVES, QuizPhase, QuizResult,
    QuizSession, QuizSettings, SessionKey,
};
pub use timer::{AdvanceScheduler, AdvanceSignal, PendingAdvance};
pub use workflow::{ActiveQuiz, QuizLoopService};
