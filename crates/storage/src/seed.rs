//! Embedded sample lesson catalog.

use quiz_core::model::{Lesson, LessonDraft, LessonId, UserId, UserProfile};

use crate::repository::{LessonRepository, StorageError, UserRepository};

const SAMPLE_LESSONS_JSON: &str = include_str!("../seed/lessons.json");

/// Parse the embedded sample catalog.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the embedded JSON is malformed.
pub fn sample_lessons() -> Result<Vec<LessonDraft>, StorageError> {
    serde_json::from_str(SAMPLE_LESSONS_JSON)
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Stable id for the n-th sample lesson, so reseeding replaces instead of duplicating.
#[must_use]
pub fn sample_lesson_id(index: usize) -> LessonId {
    LessonId::new(format!("sample-{:02}", index + 1))
}

/// Write every sample lesson into the repository and return them.
///
/// # Errors
///
/// Returns `StorageError` if parsing or persistence fails.
pub async fn seed_sample_lessons(
    lessons: &dyn LessonRepository,
) -> Result<Vec<Lesson>, StorageError> {
    let drafts = sample_lessons()?;
    let mut seeded = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.into_iter().enumerate() {
        let lesson = draft
            .into_lesson(sample_lesson_id(index))
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        lessons.upsert_lesson(&lesson).await?;
        seeded.push(lesson);
    }
    tracing::info!(count = seeded.len(), "seeded sample lessons");
    Ok(seeded)
}

/// Create the user record, or update name and role while keeping progress.
///
/// # Errors
///
/// Returns `StorageError` if the repository fails.
pub async fn ensure_user(
    users: &dyn UserRepository,
    id: &UserId,
    name: &str,
    admin: bool,
) -> Result<UserProfile, StorageError> {
    let mut profile = users
        .get_user(id)
        .await?
        .unwrap_or_else(|| UserProfile::new(id.clone(), name, admin));
    profile.name = name.to_owned();
    profile.admin = admin;
    users.upsert_user(&profile).await?;
    tracing::info!(user = %id, admin, "user record ready");
    Ok(profile)
}
