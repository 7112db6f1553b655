use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;

use quiz_core::model::UserId;
use services::{
    AccessError, AdvanceSignal, AppServices, Bootstrap, LessonService, ProgressService,
    QuizLoopService,
};

pub trait UiApp: Send + Sync {
    /// Who is using the app; `None` when no identity was supplied.
    fn user_id(&self) -> Option<UserId>;

    fn services(&self) -> AppServices;
    fn advance_signals(&self) -> AdvanceInbox;
}

/// The receiving end of the quiz advance timers, shareable through context.
/// Only the root view drains it.
#[derive(Clone)]
pub struct AdvanceInbox {
    rx: Arc<Mutex<UnboundedReceiver<AdvanceSignal>>>,
}

impl AdvanceInbox {
    #[must_use]
    pub fn new(rx: UnboundedReceiver<AdvanceSignal>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Wait for the next fired timer. `None` once every sender is gone.
    pub async fn recv(&self) -> Option<AdvanceSignal> {
        self.rx.lock().await.recv().await
    }
}

#[derive(Clone)]
pub struct AppContext {
    user_id: Option<UserId>,
    services: AppServices,
    advance: AdvanceInbox,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            user_id: app.user_id(),
            services: app.services(),
            advance: app.advance_signals(),
        }
    }

    /// Resolve the configured identity and load the first screen's data.
    ///
    /// # Errors
    ///
    /// See [`AppServices::bootstrap`].
    pub async fn bootstrap(&self) -> Result<Bootstrap, AccessError> {
        self.services.bootstrap(self.user_id.as_ref()).await
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        self.services.lessons()
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.services.quiz_loop()
    }

    #[must_use]
    pub fn advance_signals(&self) -> AdvanceInbox {
        self.advance.clone()
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
