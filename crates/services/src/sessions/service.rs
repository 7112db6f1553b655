use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use quiz_core::model::{Lesson, LessonId, ProgressUpdate, Question};
use quiz_core::scoring;

use super::progress::SessionProgress;
use crate::error::SessionError;

/// Lives granted at the start of every session unless configured otherwise.
pub const MAX_LIVES: u8 = 3;

/// How long the right/wrong feedback stays up before the session moves on.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(1500);

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    max_lives: u8,
    advance_delay: Duration,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            max_lives: MAX_LIVES,
            advance_delay: DEFAULT_ADVANCE_DELAY,
        }
    }
}

impl QuizSettings {
    /// At least one life is always granted.
    #[must_use]
    pub fn with_max_lives(mut self, lives: u8) -> Self {
        self.max_lives = lives.max(1);
        self
    }

    #[must_use]
    pub fn max_lives(&self) -> u8 {
        self.max_lives
    }

    #[must_use]
    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    #[must_use]
    pub fn advance_delay(&self) -> Duration {
        self.advance_delay
    }
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

static NEXT_SESSION_KEY: AtomicU64 = AtomicU64::new(1);

/// Identifies one session instance; timers carry it so a signal armed for a
/// torn-down session can never act on a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey(u64);

impl SessionKey {
    fn next() -> Self {
        Self(NEXT_SESSION_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    AnsweringQuestion,
    ShowingResult,
    Complete,
}

/// What the user sees right after submitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_index: usize,
    pub selected: usize,
    pub correct_answer: usize,
    pub is_correct: bool,
    pub score: u32,
    pub lives: u8,
}

/// Final outcome of a session, independent of whether it was persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub lesson_id: LessonId,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u8,
    pub lives_left: u8,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl QuizResult {
    /// The single progress-store write for this result.
    #[must_use]
    pub fn progress_update(&self) -> ProgressUpdate {
        ProgressUpdate {
            lesson_id: self.lesson_id.clone(),
            percentage: self.percentage,
            score: self.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    NextQuestion { index: usize },
    Completed(QuizResult),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at one lesson.
///
/// Sequencing: `select_answer` (any number of times) then `submit_answer`
/// moves to `ShowingResult`; `advance` either opens the next question or
/// completes. Score and lives are only touched by `submit_answer`, and the
/// completion check in `advance` reads the already-updated lives, so the
/// answer that takes lives to zero ends the session.
pub struct QuizSession {
    key: SessionKey,
    lesson: Lesson,
    total: u32,
    current: usize,
    selected: Option<usize>,
    score: u32,
    lives: u8,
    max_lives: u8,
    phase: QuizPhase,
    last_feedback: Option<AnswerFeedback>,
    started_at: DateTime<Utc>,
    result: Option<QuizResult>,
}

impl QuizSession {
    /// Start a fresh attempt: full lives, zero score, first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyLesson` if the lesson has no questions.
    pub fn new(
        lesson: Lesson,
        settings: &QuizSettings,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if !lesson.is_playable() {
            return Err(SessionError::EmptyLesson);
        }
        let total = u32::try_from(lesson.question_count())
            .map_err(|_| SessionError::TooManyQuestions(lesson.question_count()))?;

        Ok(Self {
            key: SessionKey::next(),
            lesson,
            total,
            current: 0,
            selected: None,
            score: 0,
            lives: settings.max_lives(),
            max_lives: settings.max_lives(),
            phase: QuizPhase::AnsweringQuestion,
            last_feedback: None,
            started_at,
            result: None,
        })
    }

    #[must_use]
    pub fn key(&self) -> SessionKey {
        self.key
    }

    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.lesson.questions()[self.current]
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn lives(&self) -> u8 {
        self.lives
    }

    #[must_use]
    pub fn max_lives(&self) -> u8 {
        self.max_lives
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Feedback for the most recent submission, kept while the result is shown.
    #[must_use]
    pub fn last_feedback(&self) -> Option<&AnswerFeedback> {
        self.last_feedback.as_ref()
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Complete
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::new(
            self.current,
            self.lesson.question_count(),
            self.score,
            self.lives,
            self.max_lives,
            self.is_complete(),
        )
    }

    /// Choose (or change) the pending answer for the open question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAnswering` outside `AnsweringQuestion`,
    /// `SessionError::Completed` once finished, and
    /// `SessionError::AnswerOutOfRange` for an invalid index.
    pub fn select_answer(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_answering()?;
        let len = self.current_question().answers().len();
        if index >= len {
            return Err(SessionError::AnswerOutOfRange { index, len });
        }
        self.selected = Some(index);
        Ok(())
    }

    /// Grade the selected answer and show the result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoAnswerSelected` if nothing is selected, and the
    /// same phase errors as [`QuizSession::select_answer`].
    pub fn submit_answer(&mut self) -> Result<&AnswerFeedback, SessionError> {
        self.ensure_answering()?;
        let selected = self.selected.ok_or(SessionError::NoAnswerSelected)?;

        let question = self.current_question();
        let is_correct = question.is_correct(selected);
        let correct_answer = question.correct_answer();

        if is_correct {
            self.score += 1;
        } else {
            self.lives = self.lives.saturating_sub(1);
        }
        self.phase = QuizPhase::ShowingResult;

        Ok(self.last_feedback.insert(AnswerFeedback {
            question_index: self.current,
            selected,
            correct_answer,
            is_correct,
            score: self.score,
            lives: self.lives,
        }))
    }

    /// Leave `ShowingResult`: next question while questions and lives remain,
    /// otherwise complete.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotShowingResult` unless a result is being shown.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<AdvanceOutcome, SessionError> {
        if self.phase != QuizPhase::ShowingResult {
            return Err(if self.is_complete() {
                SessionError::Completed
            } else {
                SessionError::NotShowingResult
            });
        }

        if self.current + 1 < self.lesson.question_count() && self.lives > 0 {
            self.current += 1;
            self.selected = None;
            self.last_feedback = None;
            self.phase = QuizPhase::AnsweringQuestion;
            return Ok(AdvanceOutcome::NextQuestion {
                index: self.current,
            });
        }

        let result = self.finish(now)?;
        Ok(AdvanceOutcome::Completed(result))
    }

    fn finish(&mut self, now: DateTime<Utc>) -> Result<QuizResult, SessionError> {
        let percentage = scoring::percentage(self.score, self.total)?;
        let result = QuizResult {
            lesson_id: self.lesson.id().clone(),
            score: self.score,
            total_questions: self.total,
            percentage,
            lives_left: self.lives,
            started_at: self.started_at,
            completed_at: now,
        };
        self.phase = QuizPhase::Complete;
        self.result = Some(result.clone());
        Ok(result)
    }

    fn ensure_answering(&self) -> Result<(), SessionError> {
        match self.phase {
            QuizPhase::AnsweringQuestion => Ok(()),
            QuizPhase::ShowingResult => Err(SessionError::NotAnswering),
            QuizPhase::Complete => Err(SessionError::Completed),
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("key", &self.key)
            .field("lesson_id", self.lesson.id())
            .field("current", &self.current)
            .field("selected", &self.selected)
            .field("score", &self.score)
            .field("lives", &self.lives)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Difficulty, LessonId};
    use quiz_core::time::fixed_now;

    fn build_lesson(correct: &[usize]) -> Lesson {
        let questions = correct
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Question::new(
                    format!("Q{}", i + 1),
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    *c,
                )
                .unwrap()
            })
            .collect();
        Lesson::new(
            LessonId::new("lesson"),
            "Test",
            "",
            "General",
            Difficulty::Beginner,
            questions,
        )
        .unwrap()
    }

    fn start(lesson: Lesson) -> QuizSession {
        QuizSession::new(lesson, &QuizSettings::default(), fixed_now()).unwrap()
    }

    fn answer(session: &mut QuizSession, index: usize) -> AdvanceOutcome {
        session.select_answer(index).unwrap();
        session.submit_answer().unwrap();
        session.advance(fixed_now()).unwrap()
    }

    #[test]
    fn configured_lives_shorten_the_session() {
        let settings = QuizSettings::default().with_max_lives(1);
        let mut session =
            QuizSession::new(build_lesson(&[0, 0, 0]), &settings, fixed_now()).unwrap();
        assert_eq!(session.lives(), 1);
        assert!(matches!(answer(&mut session, 3), AdvanceOutcome::Completed(_)));
        assert_eq!(QuizSettings::default().with_max_lives(0).max_lives(), 1);
    }

    fn assert_bounds(session: &QuizSession) {
        assert!(session.score() <= session.total_questions());
        assert!(session.lives() <= MAX_LIVES);
    }

    #[test]
    fn empty_lesson_cannot_start() {
        let lesson = build_lesson(&[]);
        let err = QuizSession::new(lesson, &QuizSettings::default(), fixed_now()).unwrap_err();
        assert_eq!(err, SessionError::EmptyLesson);
    }

    #[test]
    fn fresh_session_has_full_lives() {
        let session = start(build_lesson(&[0, 1]));
        assert_eq!(session.lives(), MAX_LIVES);
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), QuizPhase::AnsweringQuestion);
        assert_eq!(session.selected_answer(), None);
    }

    #[test]
    fn last_selection_wins() {
        let mut session = start(build_lesson(&[2]));
        session.select_answer(0).unwrap();
        session.select_answer(1).unwrap();
        session.select_answer(2).unwrap();
        let feedback = session.submit_answer().unwrap();
        assert_eq!(feedback.selected, 2);
        assert!(feedback.is_correct);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn submit_without_selection_is_rejected() {
        let mut session = start(build_lesson(&[0]));
        assert_eq!(
            session.submit_answer().unwrap_err(),
            SessionError::NoAnswerSelected
        );
        assert_eq!(session.phase(), QuizPhase::AnsweringQuestion);
        assert_eq!(session.lives(), MAX_LIVES);
    }

    #[test]
    fn out_of_range_selection_is_rejected_without_side_effects() {
        let mut session = start(build_lesson(&[0]));
        session.select_answer(1).unwrap();
        let err = session.select_answer(9).unwrap_err();
        assert_eq!(err, SessionError::AnswerOutOfRange { index: 9, len: 4 });
        assert_eq!(session.selected_answer(), Some(1));
    }

    #[test]
    fn selection_and_resubmission_are_blocked_while_showing_result() {
        let mut session = start(build_lesson(&[0, 0]));
        session.select_answer(1).unwrap();
        session.submit_answer().unwrap();
        assert_eq!(session.lives(), 2);

        assert_eq!(
            session.select_answer(0).unwrap_err(),
            SessionError::NotAnswering
        );
        assert_eq!(session.submit_answer().unwrap_err(), SessionError::NotAnswering);
        assert_eq!(session.lives(), 2);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn advance_requires_a_shown_result() {
        let mut session = start(build_lesson(&[0]));
        assert_eq!(
            session.advance(fixed_now()).unwrap_err(),
            SessionError::NotShowingResult
        );
    }

    #[test]
    fn all_correct_ends_with_full_lives_and_hundred_percent() {
        let mut session = start(build_lesson(&[0, 1, 2]));
        assert_eq!(answer(&mut session, 0), AdvanceOutcome::NextQuestion { index: 1 });
        assert_eq!(answer(&mut session, 1), AdvanceOutcome::NextQuestion { index: 2 });
        let AdvanceOutcome::Completed(result) = answer(&mut session, 2) else {
            panic!("expected completion");
        };
        assert_eq!(result.percentage, 100);
        assert_eq!(result.lives_left, MAX_LIVES);
        assert_eq!(result.score, 3);
        assert!(session.is_complete());
    }

    #[test]
    fn three_wrong_answers_end_the_session_early() {
        let mut session = start(build_lesson(&[0, 0, 0, 0, 0, 0]));
        answer(&mut session, 1);
        answer(&mut session, 1);
        let outcome = answer(&mut session, 1);

        let AdvanceOutcome::Completed(result) = outcome else {
            panic!("expected completion after lives ran out");
        };
        assert_eq!(session.lives(), 0);
        assert_eq!(session.current_index(), 2);
        assert_eq!(result.score, 0);
        assert_eq!(result.percentage, 0);
        assert_eq!(result.total_questions, 6);
        assert_eq!(
            session.select_answer(0).unwrap_err(),
            SessionError::Completed
        );
    }

    #[test]
    fn end_to_end_four_questions_one_miss() {
        let mut session = start(build_lesson(&[0, 1, 2, 3]));
        answer(&mut session, 0);
        answer(&mut session, 1);

        // Index 9 is not a choice at all; it is refused and the user picks a wrong one.
        assert!(session.select_answer(9).is_err());
        session.select_answer(0).unwrap();
        session.submit_answer().unwrap();
        assert_eq!(session.lives(), 2);
        assert_eq!(session.score(), 2);
        assert_eq!(
            session.advance(fixed_now()).unwrap(),
            AdvanceOutcome::NextQuestion { index: 3 }
        );

        let AdvanceOutcome::Completed(result) = answer(&mut session, 3) else {
            panic!("expected completion");
        };
        assert_eq!(result.score, 3);
        assert_eq!(result.lives_left, 2);
        assert_eq!(result.percentage, 75);
        assert_eq!(
            result.progress_update(),
            ProgressUpdate {
                lesson_id: LessonId::new("lesson"),
                percentage: 75,
                score: 3,
            }
        );
    }

    #[test]
    fn bounds_hold_after_every_transition() {
        let pattern = [0, 1, 1, 0, 1, 0, 0];
        let mut session = start(build_lesson(&[0, 0, 0, 0, 0, 0, 0]));
        for choice in pattern {
            if session.is_complete() {
                break;
            }
            session.select_answer(choice).unwrap();
            assert_bounds(&session);
            session.submit_answer().unwrap();
            assert_bounds(&session);
            session.advance(fixed_now()).unwrap();
            assert_bounds(&session);
        }
        assert!(session.is_complete());
        assert_eq!(session.lives(), 0);
    }

    #[test]
    fn sessions_get_distinct_keys() {
        let a = start(build_lesson(&[0]));
        let b = start(build_lesson(&[0]));
        assert_ne!(a.key(), b.key());
    }
}
