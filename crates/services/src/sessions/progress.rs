/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based number of the open question.
    pub question_number: usize,
    pub total: usize,
    pub score: u32,
    pub lives: u8,
    pub max_lives: u8,
    pub is_complete: bool,
}

impl SessionProgress {
    pub(crate) fn new(
        current: usize,
        total: usize,
        score: u32,
        lives: u8,
        max_lives: u8,
        is_complete: bool,
    ) -> Self {
        Self {
            question_number: (current + 1).min(total),
            total,
            score,
            lives,
            max_lives,
            is_complete,
        }
    }

    /// Share of the lesson already reached, 0..=100, for a progress bar.
    #[must_use]
    pub fn fraction_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.question_number * 100 / self.total).min(100);
        u8::try_from(pct).unwrap_or(100)
    }

    /// "Question 2 of 5".
    #[must_use]
    pub fn label(&self) -> String {
        format!("Question {} of {}", self.question_number, self.total)
    }
}
