use std::sync::Arc;

use quiz_core::model::{Lesson, ProgressUpdate, UserId, UserProfile};
use quiz_core::scoring;
use storage::repository::{ProgressRepository, StorageError, UserRepository};

use crate::error::ProgressError;

/// Reads user records and writes lesson completions.
#[derive(Clone)]
pub struct ProgressService {
    users: Arc<dyn UserRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { users, progress }
    }

    /// Load the profile for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::UnknownUser` if no record exists, or
    /// `ProgressError::Storage` on repository failures.
    pub async fn load_profile(&self, user_id: &UserId) -> Result<UserProfile, ProgressError> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| ProgressError::UnknownUser(user_id.clone()))
    }

    /// Store one finished lesson: overwrite its percentage, bump both counters.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::UnknownUser` if the user record is missing, or
    /// `ProgressError::Storage` on other repository failures.
    pub async fn record_completion(
        &self,
        user_id: &UserId,
        update: &ProgressUpdate,
    ) -> Result<(), ProgressError> {
        match self.progress.apply_completion(user_id, update).await {
            Ok(()) => Ok(()),
            Err(StorageError::NotFound) => Err(ProgressError::UnknownUser(user_id.clone())),
            Err(err) => Err(err.into()),
        }
    }

    /// Mean completion over the lessons currently in the catalog.
    ///
    /// Progress rows for lessons that no longer exist are ignored.
    #[must_use]
    pub fn overall_progress(profile: &UserProfile, lessons: &[Lesson]) -> u8 {
        scoring::overall_progress(
            lessons.iter().map(|l| profile.lesson_percentage(l.id())),
            lessons.len(),
        )
    }
}
