use quiz_core::model::{Difficulty, Lesson, LessonId, UserProfile};
use quiz_core::scoring::{self, LessonAction};
use services::ProgressService;

/// One entry of the lesson list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonCardVm {
    pub id: LessonId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub question_count: usize,
    pub progress: u8,
    pub completed: bool,
    pub action: LessonAction,
}

/// Convert the catalog plus the user's stored percentages into cards.
#[must_use]
pub fn map_lesson_cards(lessons: &[Lesson], profile: &UserProfile) -> Vec<LessonCardVm> {
    lessons
        .iter()
        .map(|lesson| {
            let progress = profile.lesson_percentage(lesson.id());
            LessonCardVm {
                id: lesson.id().clone(),
                title: lesson.title().to_owned(),
                description: lesson.description().to_owned(),
                category: lesson.category().to_owned(),
                difficulty: lesson.difficulty(),
                question_count: lesson.question_count(),
                progress,
                completed: scoring::is_mastered(progress),
                action: LessonAction::for_percentage(progress),
            }
        })
        .collect()
}

/// Top bar shown on every learner screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderVm {
    pub user_name: String,
    pub overall_progress: u8,
    pub lessons_completed: u64,
}

#[must_use]
pub fn map_header(profile: &UserProfile, lessons: &[Lesson]) -> HeaderVm {
    HeaderVm {
        user_name: profile.name.clone(),
        overall_progress: ProgressService::overall_progress(profile, lessons),
        lessons_completed: profile.lessons_completed,
    }
}
