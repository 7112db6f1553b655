use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::{LessonId, UserId};

/// The per-user record read at startup and written on quiz completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub admin: bool,
    /// Last recorded percentage (0-100) per lesson.
    pub progress: BTreeMap<LessonId, u8>,
    pub total_score: u64,
    pub lessons_completed: u64,
}

impl UserProfile {
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, admin: bool) -> Self {
        Self {
            id,
            name: name.into(),
            admin,
            progress: BTreeMap::new(),
            total_score: 0,
            lessons_completed: 0,
        }
    }

    /// Stored percentage for a lesson, 0 when never attempted.
    #[must_use]
    pub fn lesson_percentage(&self, lesson_id: &LessonId) -> u8 {
        self.progress.get(lesson_id).copied().unwrap_or(0)
    }

    /// Apply a completion the same way the progress store does.
    pub fn apply(&mut self, update: &ProgressUpdate) {
        self.progress
            .insert(update.lesson_id.clone(), update.percentage);
        self.total_score = self.total_score.saturating_add(u64::from(update.score));
        self.lessons_completed = self.lessons_completed.saturating_add(1);
    }
}

/// The single write issued when a quiz session completes.
///
/// Sets `progress[lesson_id] = percentage`, adds `score` to the running
/// total and bumps the completed-lessons counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub lesson_id: LessonId,
    pub percentage: u8,
    pub score: u32,
}
