//! Percentages, overall progress and result tiers.
//!
//! All rounding is round-half-up on the final percentage, done in integer
//! arithmetic so that 1/3 gives 33, 2/3 gives 67 and 1/8 gives 13.

use thiserror::Error;

/// Stored percentage at or above which a lesson counts as mastered.
pub const MASTERY_THRESHOLD: u8 = 80;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoringError {
    #[error("cannot score a lesson without questions")]
    NoQuestions,

    #[error("score {score} exceeds total {total}")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

/// `round(score / total * 100)`.
///
/// # Errors
///
/// Returns `ScoringError::NoQuestions` if `total` is zero.
/// Returns `ScoringError::ScoreExceedsTotal` if `score > total`.
pub fn percentage(score: u32, total: u32) -> Result<u8, ScoringError> {
    if total == 0 {
        return Err(ScoringError::NoQuestions);
    }
    if score > total {
        return Err(ScoringError::ScoreExceedsTotal { score, total });
    }
    let score = u64::from(score);
    let total = u64::from(total);
    let rounded = (score * 200 + total) / (total * 2);
    // score <= total keeps this within 0..=100
    Ok(u8::try_from(rounded).unwrap_or(100))
}

/// `round(sum(percentages) / lesson_count)`, 0 when there are no lessons.
///
/// The caller decides which percentages count; the result is capped at 100
/// in case the map carries entries for lessons that no longer exist.
#[must_use]
pub fn overall_progress<I>(percentages: I, lesson_count: usize) -> u8
where
    I: IntoIterator<Item = u8>,
{
    if lesson_count == 0 {
        return 0;
    }
    let sum: u64 = percentages.into_iter().map(u64::from).sum();
    let count = lesson_count as u64;
    let rounded = (sum * 2 + count) / (count * 2);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

/// Banding used on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTier {
    Excellent,
    GoodJob,
    KeepLearning,
}

impl ResultTier {
    #[must_use]
    pub fn for_percentage(percentage: u8) -> Self {
        if percentage >= 80 {
            Self::Excellent
        } else if percentage >= 60 {
            Self::GoodJob
        } else {
            Self::KeepLearning
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ResultTier::Excellent => "Excellent!",
            ResultTier::GoodJob => "Good Job!",
            ResultTier::KeepLearning => "Keep Learning!",
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ResultTier::Excellent => "You've mastered this topic!",
            ResultTier::GoodJob => "You're making great progress!",
            ResultTier::KeepLearning => "Practice makes perfect!",
        }
    }
}

/// Whether a stored percentage counts as a completed lesson.
#[must_use]
pub fn is_mastered(percentage: u8) -> bool {
    percentage >= MASTERY_THRESHOLD
}

/// Call to action on a lesson card, driven by the stored percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonAction {
    Start,
    Continue,
    Retake,
}

impl LessonAction {
    #[must_use]
    pub fn for_percentage(percentage: u8) -> Self {
        if is_mastered(percentage) {
            Self::Retake
        } else if percentage > 0 {
            Self::Continue
        } else {
            Self::Start
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LessonAction::Start => "Start Lesson",
            LessonAction::Continue => "Continue Lesson",
            LessonAction::Retake => "Retake Lesson",
        }
    }
}
