use quiz_core::model::{ANSWERS_PER_QUESTION, Difficulty, Lesson, LessonDraft, LessonId, Question};

use crate::views::ViewError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionFormVm {
    pub prompt: String,
    pub answers: [String; ANSWERS_PER_QUESTION],
    pub correct_answer: usize,
}

impl QuestionFormVm {
    fn blank() -> Self {
        Self {
            prompt: String::new(),
            answers: Default::default(),
            correct_answer: 0,
        }
    }

    fn from_question(question: &Question) -> Self {
        let mut answers: [String; ANSWERS_PER_QUESTION] = Default::default();
        for (slot, text) in answers.iter_mut().zip(question.answers()) {
            slot.clone_from(text);
        }
        Self {
            prompt: question.prompt().to_owned(),
            answers,
            correct_answer: question.correct_answer(),
        }
    }
}

/// The admin's add/edit lesson form. `editing` is `None` for a new lesson.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonFormVm {
    pub editing: Option<LessonId>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub questions: Vec<QuestionFormVm>,
}

impl LessonFormVm {
    /// An empty form with one empty question to fill in.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            editing: None,
            title: String::new(),
            description: String::new(),
            category: String::new(),
            difficulty: Difficulty::Beginner,
            questions: vec![QuestionFormVm::blank()],
        }
    }

    #[must_use]
    pub fn for_lesson(lesson: &Lesson) -> Self {
        let mut questions: Vec<_> = lesson
            .questions()
            .iter()
            .map(QuestionFormVm::from_question)
            .collect();
        if questions.is_empty() {
            questions.push(QuestionFormVm::blank());
        }
        Self {
            editing: Some(lesson.id().clone()),
            title: lesson.title().to_owned(),
            description: lesson.description().to_owned(),
            category: lesson.category().to_owned(),
            difficulty: lesson.difficulty(),
            questions,
        }
    }

    #[must_use]
    pub fn heading(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Lesson"
        } else {
            "Add New Lesson"
        }
    }

    #[must_use]
    pub fn save_label(&self) -> &'static str {
        if self.editing.is_some() {
            "Save Changes"
        } else {
            "Add Lesson"
        }
    }

    pub fn add_question(&mut self) {
        self.questions.push(QuestionFormVm::blank());
    }

    /// The last remaining question cannot be removed.
    pub fn remove_question(&mut self, index: usize) {
        if self.questions.len() > 1 && index < self.questions.len() {
            self.questions.remove(index);
        }
    }

    /// Validate the form into lesson content.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::InvalidLesson` if the title is blank or any
    /// question is missing its text.
    pub fn to_draft(&self) -> Result<LessonDraft, ViewError> {
        if self.title.trim().is_empty() {
            return Err(ViewError::InvalidLesson);
        }
        let questions = self
            .questions
            .iter()
            .map(|q| {
                Question::new(
                    q.prompt.trim(),
                    q.answers.iter().map(|a| a.trim().to_owned()).collect(),
                    q.correct_answer,
                )
                .map_err(|_| ViewError::InvalidLesson)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LessonDraft {
            title: self.title.trim().to_owned(),
            description: self.description.trim().to_owned(),
            category: self.category.trim().to_owned(),
            difficulty: self.difficulty,
            questions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> LessonFormVm {
        let mut form = LessonFormVm::blank();
        form.title = "  Sharing ".into();
        form.category = "Social".into();
        form.questions[0] = QuestionFormVm {
            prompt: "Your friend has no snack. What do you do?".into(),
            answers: [
                "Eat faster".into(),
                "Offer to share".into(),
                "Hide it".into(),
                "Walk away".into(),
            ],
            correct_answer: 1,
        };
        form
    }

    #[test]
    fn blank_form_is_a_new_lesson() {
        let form = LessonFormVm::blank();
        assert_eq!(form.heading(), "Add New Lesson");
        assert_eq!(form.save_label(), "Add Lesson");
        assert_eq!(form.questions.len(), 1);
        assert_eq!(form.to_draft(), Err(ViewError::InvalidLesson));
    }

    #[test]
    fn draft_is_trimmed_and_validated() {
        let draft = filled().to_draft().unwrap();
        assert_eq!(draft.title, "Sharing");
        assert_eq!(draft.questions[0].correct_text(), "Offer to share");

        let mut missing_prompt = filled();
        missing_prompt.add_question();
        assert_eq!(missing_prompt.to_draft(), Err(ViewError::InvalidLesson));
    }

    #[test]
    fn editing_round_trips_a_lesson() {
        let lesson = filled()
            .to_draft()
            .unwrap()
            .into_lesson(LessonId::new("share"))
            .unwrap();
        let form = LessonFormVm::for_lesson(&lesson);
        assert_eq!(form.heading(), "Edit Lesson");
        assert_eq!(form.editing, Some(LessonId::new("share")));
        assert_eq!(form.to_draft().unwrap(), lesson.to_draft());
    }

    #[test]
    fn last_question_stays() {
        let mut form = filled();
        form.remove_question(0);
        assert_eq!(form.questions.len(), 1);
        form.add_question();
        form.remove_question(0);
        assert_eq!(form.questions.len(), 1);
        assert!(form.questions[0].prompt.is_empty());
    }
}
