use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use quiz_core::model::{Lesson, UserId};

use super::service::{AdvanceOutcome, AnswerFeedback, QuizPhase, QuizResult, QuizSession, QuizSettings};
use super::timer::{AdvanceScheduler, AdvanceSignal, PendingAdvance};
use crate::Clock;
use crate::error::SessionError;
use crate::progress_service::ProgressService;

/// A running session together with its (at most one) armed advance timer.
///
/// Dropping it tears the session down and cancels the timer.
#[derive(Debug)]
pub struct ActiveQuiz {
    session: QuizSession,
    pending: Option<PendingAdvance>,
}

impl ActiveQuiz {
    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[cfg(test)]
    fn has_pending_advance(&self) -> bool {
        self.pending.is_some()
    }

    /// # Errors
    ///
    /// See [`QuizSession::select_answer`].
    pub fn select_answer(&mut self, index: usize) -> Result<(), SessionError> {
        self.session.select_answer(index)
    }

    /// Only the signal of the timer armed by the last submit applies.
    fn accepts(&self, signal: AdvanceSignal) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| pending.signal() == signal)
            && signal.session == self.session.key()
            && signal.question_index == self.session.current_index()
            && self.session.phase() == QuizPhase::ShowingResult
    }
}

/// Drives sessions: timers between questions and the completion write.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    settings: QuizSettings,
    scheduler: AdvanceScheduler,
    progress: Arc<ProgressService>,
}

impl QuizLoopService {
    /// Returns the service and the receiver that advance signals arrive on.
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: QuizSettings,
        progress: Arc<ProgressService>,
    ) -> (Self, UnboundedReceiver<AdvanceSignal>) {
        let (scheduler, rx) = AdvanceScheduler::new(settings.advance_delay());
        (
            Self {
                clock,
                settings,
                scheduler,
                progress,
            },
            rx,
        )
    }

    /// Start a fresh attempt at `lesson`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyLesson` if the lesson has no questions.
    pub fn start_session(&self, lesson: &Lesson) -> Result<ActiveQuiz, SessionError> {
        let session = QuizSession::new(lesson.clone(), &self.settings, self.clock.now())?;
        tracing::debug!(lesson = %lesson.id(), questions = lesson.question_count(), "quiz started");
        Ok(ActiveQuiz {
            session,
            pending: None,
        })
    }

    /// Grade the selected answer and arm the timer that will advance past it.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::submit_answer`]; nothing is armed on error.
    pub fn submit(&self, quiz: &mut ActiveQuiz) -> Result<AnswerFeedback, SessionError> {
        let feedback = quiz.session.submit_answer()?.clone();
        let signal = AdvanceSignal {
            session: quiz.session.key(),
            question_index: feedback.question_index,
        };
        // Only reachable from AnsweringQuestion, so no timer can be pending here.
        quiz.pending = Some(self.scheduler.arm(signal));
        Ok(feedback)
    }

    /// Apply a fired advance signal. Signals for another session, another
    /// question, or a session not showing a result are ignored (`Ok(None)`).
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if completing the session fails.
    pub fn on_advance(
        &self,
        quiz: &mut ActiveQuiz,
        signal: AdvanceSignal,
    ) -> Result<Option<AdvanceOutcome>, SessionError> {
        if !quiz.accepts(signal) {
            tracing::debug!(?signal, "ignoring stale advance signal");
            return Ok(None);
        }
        quiz.pending = None;
        let outcome = quiz.session.advance(self.clock.now())?;
        if let AdvanceOutcome::Completed(result) = &outcome {
            tracing::info!(
                lesson = %result.lesson_id,
                score = result.score,
                total = result.total_questions,
                percentage = result.percentage,
                "quiz completed"
            );
        }
        Ok(Some(outcome))
    }

    /// Tear down an attempt the user walked away from, cancelling its timer.
    pub fn abandon(&self, quiz: ActiveQuiz) {
        let session = &quiz.session;
        if !session.is_complete() {
            tracing::debug!(
                lesson = %session.lesson().id(),
                question = session.current_index(),
                "quiz abandoned"
            );
        }
        if let Some(pending) = quiz.pending {
            pending.cancel();
        }
    }

    /// Persist a finished session in the background.
    ///
    /// The write is best-effort: failures are logged and swallowed, and the
    /// caller never waits on it. The handle resolves to whether it landed.
    pub fn record_completion(&self, user: &UserId, result: &QuizResult) -> JoinHandle<bool> {
        let progress = Arc::clone(&self.progress);
        let user = user.clone();
        let update = result.progress_update();
        tokio::spawn(async move {
            match progress.record_completion(&user, &update).await {
                Ok(()) => {
                    tracing::debug!(user = %user, lesson = %update.lesson_id, "progress saved");
                    true
                }
                Err(err) => {
                    tracing::warn!(
                        user = %user,
                        lesson = %update.lesson_id,
                        error = %err,
                        "failed to save progress"
                    );
                    false
                }
            }
        })
    }
}
