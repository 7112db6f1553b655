use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{
    Difficulty, Lesson, LessonId, ProgressUpdate, Question, UserId, UserProfile,
};
use quiz_core::time::fixed_clock;
use services::{AppServices, QuizSettings};
use storage::repository::{
    InMemoryRepository, LessonRepository, ProgressRepository, Storage, StorageError,
    UserRepository,
};
use ui::{AdvanceInbox, AppMode, Intent, QuizApp, UiApp, ViewError, build_app_context};

struct TestApp {
    user_id: UserId,
    services: AppServices,
    advance: AdvanceInbox,
}

impl UiApp for TestApp {
    fn user_id(&self) -> Option<UserId> {
        Some(self.user_id.clone())
    }

    fn services(&self) -> AppServices {
        self.services.clone()
    }

    fn advance_signals(&self) -> AdvanceInbox {
        self.advance.clone()
    }
}

/// Completion writes that take a while to land.
struct SlowProgress {
    inner: InMemoryRepository,
}

#[async_trait::async_trait]
impl ProgressRepository for SlowProgress {
    async fn apply_completion(
        &self,
        user_id: &UserId,
        update: &ProgressUpdate,
    ) -> Result<(), StorageError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        self.inner.apply_completion(user_id, update).await
    }
}

fn lesson(id: &str, correct: &[usize]) -> Lesson {
    let questions = correct
        .iter()
        .map(|c| {
            Question::new(
                "Which one?",
                vec!["a".into(), "b".into(), "c".into(), "d".into()],
                *c,
            )
            .unwrap()
        })
        .collect();
    Lesson::new(
        LessonId::new(id),
        format!("Lesson {id}"),
        "",
        "General",
        Difficulty::Beginner,
        questions,
    )
    .unwrap()
}

async fn launch_with(storage: Storage, profile: UserProfile) -> (QuizApp, AdvanceInbox) {
    storage.users.upsert_user(&profile).await.unwrap();
    let (services, rx) = AppServices::new(
        &storage,
        fixed_clock(),
        QuizSettings::default().with_advance_delay(Duration::from_millis(1500)),
    );
    let advance = AdvanceInbox::new(rx);
    let app: Arc<dyn UiApp> = Arc::new(TestApp {
        user_id: profile.id.clone(),
        services,
        advance: advance.clone(),
    });
    let ctx = build_app_context(&app);
    let bootstrap = ctx.bootstrap().await.unwrap();
    (QuizApp::new(ctx, bootstrap), advance)
}

async fn launch(repo: &InMemoryRepository, profile: UserProfile) -> (QuizApp, AdvanceInbox) {
    launch_with(Storage::from_in_memory(repo.clone()), profile).await
}

async fn answer(app: &mut QuizApp, inbox: &AdvanceInbox, choice: usize) {
    app.handle(Intent::Choose(choice)).await.unwrap();
    app.handle(Intent::Submit).await.unwrap();
    let signal = inbox.recv().await.unwrap();
    app.on_advance(signal).unwrap();
}

fn screen_of(app: &QuizApp) -> ui::vm::QuizScreenVm {
    let AppMode::Quiz(vm) = app.mode() else {
        panic!("expected quiz screen, got {}", app.mode().name());
    };
    vm.screen()
}

#[tokio::test(start_paused = true)]
async fn learner_plays_a_lesson_and_sees_results() {
    let repo = InMemoryRepository::new();
    repo.upsert_lesson(&lesson("one", &[0, 1, 2, 3]))
        .await
        .unwrap();
    let uid = UserId::new("kid");
    let (mut app, inbox) = launch(&repo, UserProfile::new(uid.clone(), "Kid", false)).await;

    assert!(matches!(app.mode(), AppMode::LessonList));

    app.handle(Intent::Choose(1)).await.unwrap();
    let screen = screen_of(&app);
    assert_eq!(screen.progress.question_number, 1);
    assert_eq!(screen.progress.total, 4);

    answer(&mut app, &inbox, 1).await;
    answer(&mut app, &inbox, 2).await;
    answer(&mut app, &inbox, 1).await;
    assert_eq!(screen_of(&app).hearts(), "♥♥♡");
    answer(&mut app, &inbox, 4).await;

    let AppMode::ResultsDisplay(results) = app.mode() else {
        panic!("expected results screen");
    };
    assert_eq!(results.percentage, 75);
    assert_eq!(results.score_line(), "3 out of 4 correct");

    // The header reads the local profile; it must match the write before it lands.
    let profile = app.profile();
    assert_eq!(profile.lesson_percentage(&LessonId::new("one")), 75);
    assert_eq!(profile.lessons_completed, 1);
    assert_eq!(profile.total_score, 3);

    assert_eq!(app.flush_progress().await, Some(true));
    let stored = repo.get_user(&uid).await.unwrap().unwrap();
    assert_eq!(stored.lessons_completed, 1);
    assert_eq!(stored.total_score, 3);

    app.handle(Intent::Home).await.unwrap();
    assert!(matches!(app.mode(), AppMode::LessonList));
}

#[tokio::test(start_paused = true)]
async fn leaving_a_quiz_drops_the_pending_advance() {
    let repo = InMemoryRepository::new();
    repo.upsert_lesson(&lesson("one", &[0, 0])).await.unwrap();
    let (mut app, inbox) =
        launch(&repo, UserProfile::new(UserId::new("kid"), "Kid", false)).await;

    app.handle(Intent::Choose(1)).await.unwrap();
    app.handle(Intent::Choose(1)).await.unwrap();
    app.handle(Intent::Submit).await.unwrap();
    app.handle(Intent::BackToLessons).await.unwrap();

    let fired = tokio::time::timeout(Duration::from_secs(3), inbox.recv()).await;
    assert!(fired.is_err());
    assert!(matches!(app.mode(), AppMode::LessonList));
}

#[tokio::test(start_paused = true)]
async fn empty_lesson_is_refused() {
    let repo = InMemoryRepository::new();
    repo.upsert_lesson(&lesson("draft", &[])).await.unwrap();
    let (mut app, _inbox) =
        launch(&repo, UserProfile::new(UserId::new("kid"), "Kid", false)).await;

    let err = app.handle(Intent::Choose(1)).await.unwrap_err();
    assert_eq!(err, ViewError::EmptyLesson);
    assert!(matches!(app.mode(), AppMode::LessonList));
}

#[tokio::test]
async fn admin_moves_between_modes() {
    let repo = InMemoryRepository::new();
    let (mut app, _inbox) =
        launch(&repo, UserProfile::new(UserId::new("boss"), "Boss", true)).await;

    assert!(matches!(app.mode(), AppMode::ModeSelection));

    app.handle(Intent::Choose(2)).await.unwrap();
    assert!(matches!(app.mode(), AppMode::AdminConsole { form: None }));
    app.handle(Intent::Seed).await.unwrap();
    let seeded = app.lessons().len();
    assert!(seeded > 0);

    app.handle(Intent::Delete(1)).await.unwrap();
    assert_eq!(app.lessons().len(), seeded - 1);
    assert!(app.notice().is_some_and(|n| n.starts_with("Deleted")));

    app.handle(Intent::Home).await.unwrap();
    assert!(matches!(app.mode(), AppMode::ModeSelection));

    app.handle(Intent::Choose(1)).await.unwrap();
    assert!(matches!(app.mode(), AppMode::LessonList));
    assert_eq!(app.lessons().len(), seeded - 1);

    assert_eq!(
        app.handle(Intent::Seed).await.unwrap_err(),
        ViewError::NotAvailable
    );
}

#[tokio::test]
async fn admin_adds_and_edits_a_lesson_through_the_form() {
    let repo = InMemoryRepository::new();
    let (mut app, _inbox) =
        launch(&repo, UserProfile::new(UserId::new("boss"), "Boss", true)).await;
    app.handle(Intent::Choose(2)).await.unwrap();

    app.handle(Intent::NewLesson).await.unwrap();
    let AppMode::AdminConsole { form: Some(form) } = app.mode() else {
        panic!("expected an open form");
    };
    let mut form = form.clone();
    assert_eq!(
        app.handle(Intent::SaveLesson(form.clone())).await.unwrap_err(),
        ViewError::InvalidLesson
    );

    form.title = "Sharing".into();
    form.category = "Social".into();
    form.questions[0].prompt = "Your friend has no snack. What do you do?".into();
    form.questions[0].answers = [
        "Eat faster".into(),
        "Offer to share".into(),
        "Hide it".into(),
        "Walk away".into(),
    ];
    form.questions[0].correct_answer = 1;
    app.handle(Intent::SaveLesson(form)).await.unwrap();
    assert!(matches!(app.mode(), AppMode::AdminConsole { form: None }));
    assert_eq!(app.notice(), Some("Lesson added successfully!"));
    assert_eq!(app.lessons().len(), 1);
    let id = app.lessons()[0].id().clone();

    app.handle(Intent::EditLesson(1)).await.unwrap();
    let AppMode::AdminConsole { form: Some(form) } = app.mode() else {
        panic!("expected the edit form");
    };
    assert_eq!(form.editing.as_ref(), Some(&id));
    let mut form = form.clone();
    form.title = "Sharing is caring".into();
    app.handle(Intent::SaveLesson(form)).await.unwrap();

    assert_eq!(app.notice(), Some("Lesson updated successfully!"));
    let stored = repo.get_lesson(&id).await.unwrap().unwrap();
    assert_eq!(stored.title(), "Sharing is caring");
    assert_eq!(repo.list_lessons().await.unwrap().len(), 1);

    app.handle(Intent::EditLesson(1)).await.unwrap();
    app.handle(Intent::CancelEdit).await.unwrap();
    assert!(matches!(app.mode(), AppMode::AdminConsole { form: None }));
}

#[tokio::test(start_paused = true)]
async fn returning_to_lessons_waits_for_the_last_save() {
    let repo = InMemoryRepository::new();
    repo.upsert_lesson(&lesson("one", &[0, 1, 2, 3]))
        .await
        .unwrap();
    let mut storage = Storage::from_in_memory(repo.clone());
    storage.progress = Arc::new(SlowProgress { inner: repo.clone() });
    let (mut app, inbox) =
        launch_with(storage, UserProfile::new(UserId::new("boss"), "Boss", true)).await;

    app.handle(Intent::Choose(1)).await.unwrap();
    app.handle(Intent::Choose(1)).await.unwrap();
    for choice in [1, 2, 1, 4] {
        answer(&mut app, &inbox, choice).await;
    }
    assert!(matches!(app.mode(), AppMode::ResultsDisplay(_)));

    app.handle(Intent::Home).await.unwrap();
    app.handle(Intent::Choose(1)).await.unwrap();

    assert!(matches!(app.mode(), AppMode::LessonList));
    let profile = app.profile();
    assert_eq!(profile.lesson_percentage(&LessonId::new("one")), 75);
    assert_eq!(profile.lessons_completed, 1);
}
