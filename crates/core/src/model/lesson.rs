use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::LessonId;
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = LessonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(Self::Beginner),
            "Intermediate" => Ok(Self::Intermediate),
            "Advanced" => Ok(Self::Advanced),
            other => Err(LessonError::UnknownDifficulty(other.to_string())),
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Lesson content without an id, as authored in seed data or imported JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl LessonDraft {
    /// Attach an id and validate.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` if the title is blank.
    pub fn into_lesson(self, id: LessonId) -> Result<Lesson, LessonError> {
        Lesson::new(
            id,
            self.title,
            self.description,
            self.category,
            self.difficulty,
            self.questions,
        )
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A named, ordered set of quiz questions.
///
/// A lesson may legitimately hold zero questions while it is being authored;
/// such a lesson is listed but cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLesson")]
pub struct Lesson {
    id: LessonId,
    title: String,
    description: String,
    category: String,
    difficulty: Difficulty,
    questions: Vec<Question>,
}

impl Lesson {
    /// Creates a lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` if the title is blank.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        difficulty: Difficulty,
        questions: Vec<Question>,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }

        Ok(Self {
            id,
            title,
            description: description.into(),
            category: category.into(),
            difficulty,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// True when the lesson has at least one question.
    #[must_use]
    pub fn is_playable(&self) -> bool {
        !self.questions.is_empty()
    }

    /// Strip the id, e.g. for export or re-import under a fresh id.
    #[must_use]
    pub fn to_draft(&self) -> LessonDraft {
        LessonDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            difficulty: self.difficulty,
            questions: self.questions.clone(),
        }
    }
}

#[derive(Deserialize)]
struct RawLesson {
    id: LessonId,
    #[serde(flatten)]
    draft: LessonDraft,
}

impl TryFrom<RawLesson> for Lesson {
    type Error = LessonError;

    fn try_from(raw: RawLesson) -> Result<Self, Self::Error> {
        raw.draft.into_lesson(raw.id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
