use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use quiz_core::model::{Lesson, UserId, UserProfile};
use storage::repository::{Storage, StorageError};

use crate::Clock;
use crate::error::{AccessError, AppServicesError, LessonServiceError, ProgressError};
use crate::lesson_service::LessonService;
use crate::progress_service::ProgressService;
use crate::sessions::{AdvanceSignal, QuizLoopService, QuizSettings};

/// What the app needs to leave its loading screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bootstrap {
    pub profile: UserProfile,
    /// Preloaded for learners; admins fetch the catalog when they pick a mode.
    pub lessons: Option<Vec<Lesson>>,
}

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    lessons: Arc<LessonService>,
    progress: Arc<ProgressService>,
    quiz_loop: Arc<QuizLoopService>,
}

impl AppServices {
    /// Wire services over `storage`. The receiver carries quiz advance signals
    /// and belongs to the event loop.
    #[must_use]
    pub fn new(
        storage: &Storage,
        clock: Clock,
        settings: QuizSettings,
    ) -> (Self, UnboundedReceiver<AdvanceSignal>) {
        let lessons = Arc::new(LessonService::new(Arc::clone(&storage.lessons)));
        let progress = Arc::new(ProgressService::new(
            Arc::clone(&storage.users),
            Arc::clone(&storage.progress),
        ));
        let (quiz_loop, rx) = QuizLoopService::new(clock, settings, Arc::clone(&progress));

        (
            Self {
                lessons,
                progress,
                quiz_loop: Arc::new(quiz_loop),
            },
            rx,
        )
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: QuizSettings,
    ) -> Result<(Self, UnboundedReceiver<AdvanceSignal>), AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(&storage, clock, settings))
    }

    /// Resolve the caller's identity and load what the first screen needs.
    ///
    /// The id is trusted as given; there is no authentication.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::MissingIdentity` when no id was supplied,
    /// `AccessError::UnknownUser` when no record exists for it, and
    /// `AccessError::LoadFailed` when storage cannot be read.
    pub async fn bootstrap(&self, user_id: Option<&UserId>) -> Result<Bootstrap, AccessError> {
        let user_id = user_id.ok_or(AccessError::MissingIdentity)?;
        let profile = match self.progress.load_profile(user_id).await {
            Ok(profile) => profile,
            Err(ProgressError::UnknownUser(id)) => return Err(AccessError::UnknownUser(id)),
            Err(ProgressError::Storage(err)) => return Err(AccessError::LoadFailed(err)),
        };

        let lessons = if profile.admin {
            None
        } else {
            Some(self.load_catalog().await?)
        };
        tracing::info!(user = %profile.id, admin = profile.admin, "user loaded");

        Ok(Bootstrap { profile, lessons })
    }

    /// Fetch the full catalog for the lesson list.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::LoadFailed` when storage cannot be read.
    pub async fn load_catalog(&self) -> Result<Vec<Lesson>, AccessError> {
        match self.lessons.list_lessons().await {
            Ok(lessons) => Ok(lessons),
            Err(LessonServiceError::Storage(err)) => Err(AccessError::LoadFailed(err)),
            Err(other) => Err(AccessError::LoadFailed(StorageError::Serialization(
                other.to_string(),
            ))),
        }
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        Arc::clone(&self.lessons)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }
}
