use std::sync::Arc;

use serde::Deserialize;

use quiz_core::model::{Lesson, LessonDraft, LessonId};
use storage::repository::{LessonRepository, StorageError};
use storage::seed;

use crate::error::LessonServiceError;

/// One entry of an imported catalog: a stored lesson keeps its id, a bare
/// draft gets a fresh one.
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportEntry {
    Stored(Lesson),
    Draft(LessonDraft),
}

/// Admin-side lesson catalog management.
#[derive(Clone)]
pub struct LessonService {
    lessons: Arc<dyn LessonRepository>,
}

impl LessonService {
    #[must_use]
    pub fn new(lessons: Arc<dyn LessonRepository>) -> Self {
        Self { lessons }
    }

    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` if repository access fails.
    pub async fn list_lessons(&self) -> Result<Vec<Lesson>, LessonServiceError> {
        Ok(self.lessons.list_lessons().await?)
    }

    /// Returns `Ok(None)` when the lesson does not exist.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` if repository access fails.
    pub async fn get_lesson(&self, id: &LessonId) -> Result<Option<Lesson>, LessonServiceError> {
        Ok(self.lessons.get_lesson(id).await?)
    }

    /// Validate a draft, give it a fresh id, and persist it.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Lesson` for validation failures.
    /// Returns `LessonServiceError::Storage` if persistence fails.
    pub async fn create_lesson(&self, draft: LessonDraft) -> Result<Lesson, LessonServiceError> {
        let lesson = draft.into_lesson(LessonId::generate())?;
        self.lessons.upsert_lesson(&lesson).await?;
        tracing::info!(lesson = %lesson.id(), title = lesson.title(), "lesson created");
        Ok(lesson)
    }

    /// Replace an existing lesson's content.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` with `StorageError::NotFound` if
    /// the lesson does not exist, or on repository failures.
    pub async fn update_lesson(&self, lesson: &Lesson) -> Result<(), LessonServiceError> {
        if self.lessons.get_lesson(lesson.id()).await?.is_none() {
            return Err(StorageError::NotFound.into());
        }
        self.lessons.upsert_lesson(lesson).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` with `StorageError::NotFound` if
    /// the lesson does not exist, or on repository failures.
    pub async fn delete_lesson(&self, id: &LessonId) -> Result<(), LessonServiceError> {
        self.lessons.delete_lesson(id).await?;
        tracing::info!(lesson = %id, "lesson deleted");
        Ok(())
    }

    /// Load the built-in sample catalog; running it twice changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` if parsing or persistence fails.
    pub async fn seed_sample_lessons(&self) -> Result<Vec<Lesson>, LessonServiceError> {
        Ok(seed::seed_sample_lessons(self.lessons.as_ref()).await?)
    }

    /// Import a JSON array of lessons. Entries with an `id` are upserted
    /// under that id; entries without one are created fresh.
    ///
    /// Nothing is written unless every entry parses and validates.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Json` for malformed or invalid input.
    /// Returns `LessonServiceError::Lesson` for validation failures.
    /// Returns `LessonServiceError::Storage` if persistence fails.
    pub async fn import_json(&self, json: &str) -> Result<Vec<Lesson>, LessonServiceError> {
        let entries: Vec<ImportEntry> = serde_json::from_str(json)?;
        let lessons = entries
            .into_iter()
            .map(|entry| match entry {
                ImportEntry::Stored(lesson) => Ok(lesson),
                ImportEntry::Draft(draft) => draft.into_lesson(LessonId::generate()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        for lesson in &lessons {
            self.lessons.upsert_lesson(lesson).await?;
        }
        tracing::info!(count = lessons.len(), "lessons imported");
        Ok(lessons)
    }

    /// Serialize the whole catalog, ids included, as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` if repository access fails.
    pub async fn export_json(&self) -> Result<String, LessonServiceError> {
        let lessons = self.lessons.list_lessons().await?;
        Ok(serde_json::to_string_pretty(&lessons)?)
    }
}
