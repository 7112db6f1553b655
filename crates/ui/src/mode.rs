use crate::vm::{LessonFormVm, QuizVm, ResultsVm};

/// Top-level screens. A quiz session only ever lives inside `Quiz`.
#[derive(Debug)]
pub enum AppMode {
    ModeSelection,
    LessonList,
    Quiz(QuizVm),
    ResultsDisplay(ResultsVm),
    /// `form` is the add/edit lesson form, when one is open.
    AdminConsole { form: Option<LessonFormVm> },
}

impl AppMode {
    /// Where "home" is: admins pick a mode, learners see their lessons.
    #[must_use]
    pub fn home_for(admin: bool) -> Self {
        if admin {
            Self::ModeSelection
        } else {
            Self::LessonList
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            AppMode::ModeSelection => "mode selection",
            AppMode::LessonList => "lesson list",
            AppMode::Quiz(_) => "quiz",
            AppMode::ResultsDisplay(_) => "results",
            AppMode::AdminConsole { .. } => "admin console",
        }
    }
}

/// Options on the mode selection screen, numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeChoice {
    Learn,
    Admin,
}

impl ModeChoice {
    pub const ALL: [ModeChoice; 2] = [ModeChoice::Learn, ModeChoice::Admin];

    #[must_use]
    pub fn from_number(number: usize) -> Option<Self> {
        number.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ModeChoice::Learn => "Start Learning",
            ModeChoice::Admin => "Admin Panel",
        }
    }

    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            ModeChoice::Learn => "Take quizzes and track your progress",
            ModeChoice::Admin => "Manage lessons and content",
        }
    }
}
