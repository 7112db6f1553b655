use services::{
    ActiveQuiz, AdvanceOutcome, AdvanceSignal, AnswerFeedback, QuizLoopService, QuizPhase,
    SessionError, SessionProgress,
};

use crate::views::ViewError;

/// How an answer button is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerMarker {
    Plain,
    Selected,
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerRowVm {
    /// 1-based, as typed by the user.
    pub number: usize,
    pub text: String,
    pub marker: AnswerMarker,
}

/// Everything the quiz screen draws, detached from the running session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizScreenVm {
    pub lesson_title: String,
    pub prompt: String,
    pub progress: SessionProgress,
    pub answers: Vec<AnswerRowVm>,
    pub feedback: Option<String>,
    pub answering: bool,
    pub can_submit: bool,
}

impl QuizScreenVm {
    /// Filled hearts for lives left, hollow for lives lost.
    #[must_use]
    pub fn hearts(&self) -> String {
        (0..self.progress.max_lives)
            .map(|i| if i < self.progress.lives { '♥' } else { '♡' })
            .collect()
    }
}

/// The quiz screen. Owns the running session; dropping it ends the attempt.
#[derive(Debug)]
pub struct QuizVm {
    quiz: ActiveQuiz,
}

impl QuizVm {
    #[must_use]
    pub fn new(quiz: ActiveQuiz) -> Self {
        Self { quiz }
    }

    #[must_use]
    pub fn lesson_title(&self) -> &str {
        self.quiz.session().lesson().title()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.quiz.session().progress()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        self.quiz.session().current_question().prompt()
    }

    #[must_use]
    pub fn answers(&self) -> Vec<AnswerRowVm> {
        let session = self.quiz.session();
        let question = session.current_question();
        let selected = session.selected_answer();
        let showing = session.phase() == QuizPhase::ShowingResult;

        question
            .answers()
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let marker = if showing && question.is_correct(index) {
                    AnswerMarker::Correct
                } else if showing && selected == Some(index) {
                    AnswerMarker::Incorrect
                } else if selected == Some(index) {
                    AnswerMarker::Selected
                } else {
                    AnswerMarker::Plain
                };
                AnswerRowVm {
                    number: index + 1,
                    text: text.clone(),
                    marker,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn screen(&self) -> QuizScreenVm {
        let session = self.quiz.session();
        let answering = session.phase() == QuizPhase::AnsweringQuestion;
        QuizScreenVm {
            lesson_title: self.lesson_title().to_owned(),
            prompt: self.prompt().to_owned(),
            progress: self.progress(),
            answers: self.answers(),
            feedback: self.feedback_line(),
            answering,
            can_submit: answering && session.selected_answer().is_some(),
        }
    }

    /// Result line shown while waiting for the next question.
    #[must_use]
    pub fn feedback_line(&self) -> Option<String> {
        let session = self.quiz.session();
        let feedback = session.last_feedback()?;
        if feedback.is_correct {
            Some("Correct!".to_owned())
        } else {
            Some(format!(
                "Incorrect. The correct answer was: {}",
                session.current_question().correct_text()
            ))
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::InvalidChoice` for a number that is not listed and
    /// `ViewError::NotAvailable` while a result is shown.
    pub fn select(&mut self, number: usize) -> Result<(), ViewError> {
        let index = number.checked_sub(1).ok_or(ViewError::InvalidChoice)?;
        self.quiz.select_answer(index).map_err(map_session_error)
    }

    /// # Errors
    ///
    /// Returns `ViewError::InvalidChoice` when nothing is selected yet.
    pub fn submit(&mut self, quiz_loop: &QuizLoopService) -> Result<AnswerFeedback, ViewError> {
        quiz_loop.submit(&mut self.quiz).map_err(map_session_error)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session cannot be completed.
    pub fn on_advance(
        &mut self,
        quiz_loop: &QuizLoopService,
        signal: AdvanceSignal,
    ) -> Result<Option<AdvanceOutcome>, ViewError> {
        quiz_loop
            .on_advance(&mut self.quiz, signal)
            .map_err(map_session_error)
    }

    /// Leave the quiz before it is over.
    pub fn abandon(self, quiz_loop: &QuizLoopService) {
        quiz_loop.abandon(self.quiz);
    }
}

fn map_session_error(err: SessionError) -> ViewError {
    match err {
        SessionError::EmptyLesson => ViewError::EmptyLesson,
        SessionError::AnswerOutOfRange { .. } | SessionError::NoAnswerSelected => {
            ViewError::InvalidChoice
        }
        SessionError::NotAnswering | SessionError::NotShowingResult | SessionError::Completed => {
            ViewError::NotAvailable
        }
        other => {
            tracing::error!(error = %other, "quiz session failed");
            ViewError::Unknown
        }
    }
}
