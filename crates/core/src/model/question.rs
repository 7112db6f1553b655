use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every question offers exactly this many answers.
pub const ANSWERS_PER_QUESTION: usize = 4;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyPrompt,

    #[error("expected {ANSWERS_PER_QUESTION} answers, got {0}")]
    WrongAnswerCount(usize),

    #[error("correct answer index {index} is out of range for {len} answers")]
    CorrectAnswerOutOfRange { index: usize, len: usize },
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A multiple-choice question with exactly one correct answer.
///
/// The serialized shape matches the lesson documents
/// (`question`, `answers`, `correctAnswer`) and is validated on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion", into = "RawQuestion")]
pub struct Question {
    prompt: String,
    answers: Vec<String>,
    correct_answer: usize,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for blank question text.
    /// Returns `QuestionError::WrongAnswerCount` unless exactly four answers are given.
    /// Returns `QuestionError::CorrectAnswerOutOfRange` if `correct_answer` is not a valid index.
    pub fn new(
        prompt: impl Into<String>,
        answers: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if answers.len() != ANSWERS_PER_QUESTION {
            return Err(QuestionError::WrongAnswerCount(answers.len()));
        }
        if correct_answer >= answers.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                len: answers.len(),
            });
        }

        Ok(Self {
            prompt,
            answers,
            correct_answer,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    /// Text of the correct answer, shown after a wrong submission.
    #[must_use]
    pub fn correct_text(&self) -> &str {
        &self.answers[self.correct_answer]
    }

    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_answer
    }

    #[must_use]
    pub fn has_answer(&self, index: usize) -> bool {
        index < self.answers.len()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    question: String,
    answers: Vec<String>,
    correct_answer: usize,
}

impl TryFrom<RawQuestion> for Question {
    type Error = QuestionError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        Question::new(raw.question, raw.answers, raw.correct_answer)
    }
}

impl From<Question> for RawQuestion {
    fn from(q: Question) -> Self {
        Self {
            question: q.prompt,
            answers: q.answers,
            correct_answer: q.correct_answer,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
