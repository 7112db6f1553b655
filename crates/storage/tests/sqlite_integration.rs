use quiz_core::model::{Difficulty, Lesson, LessonId, ProgressUpdate, Question, UserId, UserProfile};
use storage::repository::{LessonRepository, ProgressRepository, StorageError, UserRepository};
use storage::seed::seed_sample_lessons;
use storage::sqlite::SqliteRepository;

fn build_question(prompt: &str, correct: usize) -> Question {
    Question::new(
        prompt,
        vec!["a".into(), "b".into(), "c".into(), "d".into()],
        correct,
    )
    .unwrap()
}

fn build_lesson(id: &str, questions: Vec<Question>) -> Lesson {
    Lesson::new(
        LessonId::new(id),
        format!("Lesson {id}"),
        "desc",
        "General",
        Difficulty::Intermediate,
        questions,
    )
    .unwrap()
}

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_lesson_roundtrip_preserves_question_order() {
    let repo = connect("memdb_lesson_roundtrip").await;

    let lesson = build_lesson(
        "l1",
        vec![
            build_question("first", 0),
            build_question("second", 3),
            build_question("third", 1),
        ],
    );
    repo.upsert_lesson(&lesson).await.unwrap();

    let fetched = repo
        .get_lesson(lesson.id())
        .await
        .unwrap()
        .expect("lesson exists");
    assert_eq!(fetched, lesson);
    let prompts: Vec<_> = fetched.questions().iter().map(Question::prompt).collect();
    assert_eq!(prompts, ["first", "second", "third"]);
}

#[tokio::test]
async fn sqlite_upsert_replaces_questions_and_keeps_catalog_order() {
    let repo = connect("memdb_lesson_upsert").await;

    repo.upsert_lesson(&build_lesson("b", vec![build_question("q", 0)]))
        .await
        .unwrap();
    repo.upsert_lesson(&build_lesson("a", vec![build_question("q", 0)]))
        .await
        .unwrap();
    repo.upsert_lesson(&build_lesson("b", Vec::new()))
        .await
        .unwrap();

    let lessons = repo.list_lessons().await.unwrap();
    let ids: Vec<_> = lessons.iter().map(|l| l.id().as_str().to_owned()).collect();
    assert_eq!(ids, ["b", "a"]);
    assert_eq!(lessons[0].question_count(), 0);
    assert_eq!(lessons[1].question_count(), 1);
}

#[tokio::test]
async fn sqlite_delete_cascades_and_reports_missing() {
    let repo = connect("memdb_lesson_delete").await;
    let lesson = build_lesson("gone", vec![build_question("q", 2)]);
    repo.upsert_lesson(&lesson).await.unwrap();

    repo.delete_lesson(lesson.id()).await.unwrap();
    assert!(repo.get_lesson(lesson.id()).await.unwrap().is_none());

    let err = repo.delete_lesson(lesson.id()).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_completion_sets_progress_and_increments_counters() {
    let repo = connect("memdb_progress").await;
    let user = UserProfile::new(UserId::new("u1"), "Ada", true);
    repo.upsert_user(&user).await.unwrap();

    let lesson_id = LessonId::new("l1");
    repo.apply_completion(
        &user.id,
        &ProgressUpdate {
            lesson_id: lesson_id.clone(),
            percentage: 40,
            score: 2,
        },
    )
    .await
    .unwrap();
    repo.apply_completion(
        &user.id,
        &ProgressUpdate {
            lesson_id: lesson_id.clone(),
            percentage: 80,
            score: 4,
        },
    )
    .await
    .unwrap();

    let stored = repo.get_user(&user.id).await.unwrap().unwrap();
    assert!(stored.admin);
    assert_eq!(stored.name, "Ada");
    assert_eq!(stored.lesson_percentage(&lesson_id), 80);
    assert_eq!(stored.total_score, 6);
    assert_eq!(stored.lessons_completed, 2);
}

#[tokio::test]
async fn sqlite_completion_for_unknown_user_writes_nothing() {
    let repo = connect("memdb_progress_unknown").await;
    let ghost = UserId::new("ghost");

    let err = repo
        .apply_completion(
            &ghost,
            &ProgressUpdate {
                lesson_id: LessonId::new("l1"),
                percentage: 100,
                score: 3,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
    assert!(repo.get_user(&ghost).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_seed_catalog_loads() {
    let repo = connect("memdb_seed").await;
    let seeded = seed_sample_lessons(&repo).await.unwrap();
    let listed = repo.list_lessons().await.unwrap();
    assert_eq!(listed, seeded);
}

#[tokio::test]
async fn sqlite_file_database_runs_in_wal_mode() {
    let path = std::env::temp_dir().join(format!("quiz-wal-{}.sqlite3", std::process::id()));
    let url = format!("sqlite://{}?mode=rwc", path.display());

    let repo = SqliteRepository::connect(&url).await.expect("connect");
    assert_eq!(repo.journal_mode().await.unwrap(), "wal");
    repo.migrate().await.expect("migrate");
    repo.upsert_lesson(&build_lesson("l1", vec![build_question("only", 0)]))
        .await
        .unwrap();
    assert_eq!(repo.list_lessons().await.unwrap().len(), 1);

    repo.pool().close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
