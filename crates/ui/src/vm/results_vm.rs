use quiz_core::scoring::ResultTier;
use services::QuizResult;

/// The results screen after a finished session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub lesson_title: String,
    pub tier: ResultTier,
    pub percentage: u8,
    pub score: u32,
    pub total_questions: u32,
    pub lives_left: u8,
}

impl ResultsVm {
    #[must_use]
    pub fn new(lesson_title: impl Into<String>, result: &QuizResult) -> Self {
        Self {
            lesson_title: lesson_title.into(),
            tier: ResultTier::for_percentage(result.percentage),
            percentage: result.percentage,
            score: result.score,
            total_questions: result.total_questions,
            lives_left: result.lives_left,
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        self.tier.title()
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.tier.message()
    }

    /// "3 out of 4 correct".
    #[must_use]
    pub fn score_line(&self) -> String {
        format!("{} out of {} correct", self.score, self.total_questions)
    }
}
