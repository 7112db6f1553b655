use std::path::PathBuf;

use crate::vm::LessonFormVm;

/// Something the user asked for on the current screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// A listed option: mode, lesson, or answer, numbered from 1 as shown.
    Choose(usize),
    Submit,
    BackToLessons,
    Home,
    RefreshLessons,
    NewLesson,
    EditLesson(usize),
    CancelEdit,
    SaveLesson(LessonFormVm),
    Delete(usize),
    Seed,
    Import(PathBuf),
    Export(PathBuf),
}

impl Intent {
    /// Admin console actions; refused everywhere else.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Intent::RefreshLessons
                | Intent::NewLesson
                | Intent::EditLesson(_)
                | Intent::CancelEdit
                | Intent::SaveLesson(_)
                | Intent::Delete(_)
                | Intent::Seed
                | Intent::Import(_)
                | Intent::Export(_)
        )
    }
}
