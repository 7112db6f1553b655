use std::path::Path;

use tokio::task::JoinHandle;

use quiz_core::model::{Lesson, UserProfile};
use services::{AdvanceOutcome, AdvanceSignal, Bootstrap, LessonServiceError};

use crate::context::AppContext;
use crate::intent::Intent;
use crate::mode::{AppMode, ModeChoice};
use crate::views::ViewError;
use crate::vm::{LessonFormVm, QuizVm, ResultsVm};

/// The whole front-end state for one signed-in user.
pub struct QuizApp {
    ctx: AppContext,
    profile: UserProfile,
    lessons: Vec<Lesson>,
    mode: AppMode,
    notice: Option<String>,
    pending_save: Option<JoinHandle<bool>>,
}

impl QuizApp {
    #[must_use]
    pub fn new(ctx: AppContext, bootstrap: Bootstrap) -> Self {
        let mode = AppMode::home_for(bootstrap.profile.admin);
        Self {
            ctx,
            profile: bootstrap.profile,
            lessons: bootstrap.lessons.unwrap_or_default(),
            mode,
            notice: None,
            pending_save: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> &AppMode {
        &self.mode
    }

    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Wait for the last completion write, if one is still running.
    /// `Some(false)` means it failed; the failure is already logged.
    pub async fn flush_progress(&mut self) -> Option<bool> {
        let save = self.pending_save.take()?;
        Some(save.await.unwrap_or(false))
    }

    /// Apply one user action.
    ///
    /// # Errors
    ///
    /// Returns a `ViewError` describing why the action was refused; the
    /// current screen stays as it was.
    pub async fn handle(&mut self, intent: Intent) -> Result<(), ViewError> {
        self.notice = None;
        if intent.is_admin() {
            if !matches!(self.mode, AppMode::AdminConsole { .. }) {
                return Err(ViewError::NotAvailable);
            }
            return self.handle_admin(intent).await;
        }

        match intent {
            Intent::Home => self.set_mode(AppMode::home_for(self.profile.admin)),
            Intent::Choose(n) => match self.mode {
                AppMode::ModeSelection => {
                    match ModeChoice::from_number(n).ok_or(ViewError::InvalidChoice)? {
                        ModeChoice::Learn => self.enter_learning().await?,
                        ModeChoice::Admin => self.enter_admin().await?,
                    }
                }
                AppMode::LessonList => self.start_lesson(n)?,
                AppMode::Quiz(ref mut vm) => vm.select(n)?,
                _ => return Err(ViewError::NotAvailable),
            },
            Intent::Submit => match self.mode {
                AppMode::Quiz(ref mut vm) => {
                    vm.submit(&self.ctx.quiz_loop())?;
                }
                _ => return Err(ViewError::NotAvailable),
            },
            Intent::BackToLessons => match self.mode {
                AppMode::Quiz(_) | AppMode::ResultsDisplay(_) => self.set_mode(AppMode::LessonList),
                _ => return Err(ViewError::NotAvailable),
            },
            _ => return Err(ViewError::NotAvailable),
        }
        Ok(())
    }

    /// Route a fired advance timer to the running quiz. Anything not meant
    /// for it is dropped by the session itself.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the session cannot be completed.
    pub fn on_advance(&mut self, signal: AdvanceSignal) -> Result<(), ViewError> {
        let AppMode::Quiz(vm) = &mut self.mode else {
            tracing::debug!(?signal, "advance signal with no quiz running");
            return Ok(());
        };
        let quiz_loop = self.ctx.quiz_loop();
        let Some(AdvanceOutcome::Completed(result)) = vm.on_advance(&quiz_loop, signal)? else {
            return Ok(());
        };

        let results = ResultsVm::new(vm.lesson_title(), &result);
        // Mirror the write locally so the header is current without a reload.
        self.profile.apply(&result.progress_update());
        self.pending_save = Some(quiz_loop.record_completion(&self.profile.id, &result));
        self.set_mode(AppMode::ResultsDisplay(results));
        Ok(())
    }

    fn set_mode(&mut self, next: AppMode) {
        let previous = std::mem::replace(&mut self.mode, next);
        tracing::debug!(from = previous.name(), to = self.mode.name(), "mode changed");
        if let AppMode::Quiz(vm) = previous {
            vm.abandon(&self.ctx.quiz_loop());
        }
    }

    fn start_lesson(&mut self, number: usize) -> Result<(), ViewError> {
        if self.lessons.is_empty() {
            return Err(ViewError::NoLessons);
        }
        let lesson = number
            .checked_sub(1)
            .and_then(|i| self.lessons.get(i))
            .ok_or(ViewError::InvalidChoice)?;
        if !lesson.is_playable() {
            return Err(ViewError::EmptyLesson);
        }
        let quiz = self
            .ctx
            .quiz_loop()
            .start_session(lesson)
            .map_err(|_| ViewError::EmptyLesson)?;
        self.set_mode(AppMode::Quiz(QuizVm::new(quiz)));
        Ok(())
    }

    async fn enter_learning(&mut self) -> Result<(), ViewError> {
        // A reload must not race the last completion write.
        self.flush_progress().await;
        // Admins skipped the catalog at startup; fetch it with fresh progress.
        self.profile = self
            .ctx
            .progress()
            .load_profile(&self.profile.id)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "failed to reload profile");
                ViewError::LoadFailed
            })?;
        self.refresh_catalog().await?;
        self.set_mode(AppMode::LessonList);
        Ok(())
    }

    async fn enter_admin(&mut self) -> Result<(), ViewError> {
        self.refresh_catalog().await?;
        self.set_mode(AppMode::AdminConsole { form: None });
        Ok(())
    }

    async fn handle_admin(&mut self, intent: Intent) -> Result<(), ViewError> {
        match intent {
            Intent::RefreshLessons => self.refresh_catalog().await,
            Intent::NewLesson => {
                self.set_form(Some(LessonFormVm::blank()));
                Ok(())
            }
            Intent::EditLesson(n) => {
                let form = LessonFormVm::for_lesson(self.listed(n)?);
                self.set_form(Some(form));
                Ok(())
            }
            Intent::CancelEdit => {
                self.set_form(None);
                Ok(())
            }
            Intent::SaveLesson(form) => self.save_lesson(&form).await,
            Intent::Delete(n) => self.delete_lesson(n).await,
            Intent::Seed => self.seed_lessons().await,
            Intent::Import(path) => self.import_lessons(&path).await,
            Intent::Export(path) => self.export_lessons(&path).await,
            _ => Err(ViewError::NotAvailable),
        }
    }

    fn set_form(&mut self, next: Option<LessonFormVm>) {
        if let AppMode::AdminConsole { form } = &mut self.mode {
            *form = next;
        }
    }

    fn listed(&self, number: usize) -> Result<&Lesson, ViewError> {
        number
            .checked_sub(1)
            .and_then(|i| self.lessons.get(i))
            .ok_or(ViewError::InvalidChoice)
    }

    async fn refresh_catalog(&mut self) -> Result<(), ViewError> {
        self.lessons = self
            .ctx
            .lessons()
            .list_lessons()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "failed to load lessons");
                ViewError::LoadFailed
            })?;
        Ok(())
    }

    async fn save_lesson(&mut self, form: &LessonFormVm) -> Result<(), ViewError> {
        let draft = form.to_draft()?;
        let lessons = self.ctx.lessons();
        let notice = match &form.editing {
            None => {
                lessons.create_lesson(draft).await.map_err(admin_failed)?;
                "Lesson added successfully!"
            }
            Some(id) => {
                let lesson = draft
                    .into_lesson(id.clone())
                    .map_err(|_| ViewError::InvalidLesson)?;
                lessons.update_lesson(&lesson).await.map_err(admin_failed)?;
                "Lesson updated successfully!"
            }
        };
        self.set_form(None);
        self.refresh_catalog().await?;
        self.notice = Some(notice.to_owned());
        Ok(())
    }

    async fn delete_lesson(&mut self, number: usize) -> Result<(), ViewError> {
        let lesson = self.listed(number)?;
        let (id, title) = (lesson.id().clone(), lesson.title().to_owned());
        self.ctx
            .lessons()
            .delete_lesson(&id)
            .await
            .map_err(admin_failed)?;
        self.refresh_catalog().await?;
        self.notice = Some(format!("Deleted \"{title}\"."));
        Ok(())
    }

    async fn seed_lessons(&mut self) -> Result<(), ViewError> {
        let seeded = self
            .ctx
            .lessons()
            .seed_sample_lessons()
            .await
            .map_err(admin_failed)?;
        self.refresh_catalog().await?;
        self.notice = Some(format!("Loaded {} sample lessons.", seeded.len()));
        Ok(())
    }

    async fn import_lessons(&mut self, path: &Path) -> Result<(), ViewError> {
        let json = tokio::fs::read_to_string(path).await.map_err(|err| {
            tracing::warn!(path = %path.display(), error = %err, "failed to read import file");
            ViewError::AdminActionFailed
        })?;
        let imported = self
            .ctx
            .lessons()
            .import_json(&json)
            .await
            .map_err(admin_failed)?;
        self.refresh_catalog().await?;
        self.notice = Some(format!(
            "Imported {} lessons from {}.",
            imported.len(),
            path.display()
        ));
        Ok(())
    }

    async fn export_lessons(&mut self, path: &Path) -> Result<(), ViewError> {
        let json = self.ctx.lessons().export_json().await.map_err(admin_failed)?;
        tokio::fs::write(path, json).await.map_err(|err| {
            tracing::warn!(path = %path.display(), error = %err, "failed to write export file");
            ViewError::AdminActionFailed
        })?;
        self.notice = Some(format!("Exported lessons to {}.", path.display()));
        Ok(())
    }
}

fn admin_failed(err: LessonServiceError) -> ViewError {
    tracing::warn!(error = %err, "admin action failed");
    ViewError::AdminActionFailed
}
