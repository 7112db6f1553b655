use async_trait::async_trait;
use quiz_core::model::{Lesson, LessonId, ProgressUpdate, UserId, UserProfile};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read/write access to the lesson catalog.
#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Fetch the whole catalog in one read.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError>;

    /// Fetch a lesson by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on access failures.
    async fn get_lesson(&self, id: &LessonId) -> Result<Option<Lesson>, StorageError>;

    /// Persist or replace a lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lesson cannot be stored.
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError>;

    /// Remove a lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the lesson does not exist.
    async fn delete_lesson(&self, id: &LessonId) -> Result<(), StorageError>;
}

/// Per-user records (name, admin flag, progress map, counters).
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user record.
    ///
    /// Returns `Ok(None)` when no record exists for the id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on access failures.
    async fn get_user(&self, id: &UserId) -> Result<Option<UserProfile>, StorageError>;

    /// Create or replace a user record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_user(&self, profile: &UserProfile) -> Result<(), StorageError>;
}

/// Write path for quiz completions.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Set `progress[lesson_id]`, add to `total_score`, bump `lessons_completed`.
    ///
    /// All three writes are attempted together.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user record does not exist.
    async fn apply_completion(
        &self,
        user_id: &UserId,
        update: &ProgressUpdate,
    ) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    lessons: Arc<Mutex<Vec<Lesson>>>,
    users: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl LessonRepository for InMemoryRepository {
    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError> {
        let guard = self.lessons.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn get_lesson(&self, id: &LessonId) -> Result<Option<Lesson>, StorageError> {
        let guard = self.lessons.lock().map_err(poisoned)?;
        Ok(guard.iter().find(|l| l.id() == id).cloned())
    }

    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        let mut guard = self.lessons.lock().map_err(poisoned)?;
        match guard.iter_mut().find(|l| l.id() == lesson.id()) {
            Some(existing) => *existing = lesson.clone(),
            None => guard.push(lesson.clone()),
        }
        Ok(())
    }

    async fn delete_lesson(&self, id: &LessonId) -> Result<(), StorageError> {
        let mut guard = self.lessons.lock().map_err(poisoned)?;
        let before = guard.len();
        guard.retain(|l| l.id() != id);
        if guard.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: &UserId) -> Result<Option<UserProfile>, StorageError> {
        let guard = self.users.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    async fn upsert_user(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let mut guard = self.users.lock().map_err(poisoned)?;
        guard.insert(profile.id.clone(), profile.clone());
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn apply_completion(
        &self,
        user_id: &UserId,
        update: &ProgressUpdate,
    ) -> Result<(), StorageError> {
        let mut guard = self.users.lock().map_err(poisoned)?;
        let profile = guard.get_mut(user_id).ok_or(StorageError::NotFound)?;
        profile.apply(update);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub lessons: Arc<dyn LessonRepository>,
    pub users: Arc<dyn UserRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    /// Wrap an existing in-memory repository so tests can keep a handle to it.
    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let lessons: Arc<dyn LessonRepository> = Arc::new(repo.clone());
        let users: Arc<dyn UserRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self {
            lessons,
            users,
            progress,
        }
    }
}
