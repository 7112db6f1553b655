use quiz_core::model::{Difficulty, Lesson, LessonId, Question, UserId, UserProfile};
use quiz_core::scoring::ResultTier;
use services::SessionProgress;
use storage::repository::{InMemoryRepository, LessonRepository};

use super::test_harness::{ScreenKind, render_screen, setup_home_harness};
use crate::vm::{AnswerMarker, AnswerRowVm, LessonFormVm, QuizScreenVm, ResultsVm, map_lesson_cards};

fn lesson(id: &str, title: &str) -> Lesson {
    let question = Question::new(
        "Which one?",
        vec!["a".into(), "b".into(), "c".into(), "d".into()],
        0,
    )
    .unwrap();
    Lesson::new(
        LessonId::new(id),
        title,
        "Be kind",
        "Social",
        Difficulty::Beginner,
        vec![question],
    )
    .unwrap()
}

#[test]
fn quiz_view_smoke_renders_counter_and_hearts() {
    let screen = QuizScreenVm {
        lesson_title: "Kindness".into(),
        prompt: "What do you say?".into(),
        progress: SessionProgress {
            question_number: 2,
            total: 4,
            score: 1,
            lives: 2,
            max_lives: 3,
            is_complete: false,
        },
        answers: vec![
            AnswerRowVm {
                number: 1,
                text: "Thank you".into(),
                marker: AnswerMarker::Correct,
            },
            AnswerRowVm {
                number: 2,
                text: "Nothing".into(),
                marker: AnswerMarker::Incorrect,
            },
        ],
        feedback: Some("Incorrect. The correct answer was: Thank you".into()),
        answering: false,
        can_submit: false,
    };

    let html = render_screen(ScreenKind::Quiz(screen));
    assert!(html.contains("Question 2 of 4"), "missing counter in {html}");
    assert!(html.contains("♥♥♡"), "missing hearts in {html}");
    assert!(html.contains("answer-btn correct"), "missing marker in {html}");
    assert!(html.contains("The correct answer was"), "missing feedback in {html}");
    assert!(!html.contains("Submit Answer"), "submit shown while waiting in {html}");
}

#[test]
fn results_view_smoke_renders_score() {
    let results = ResultsVm {
        lesson_title: "Kindness".into(),
        tier: ResultTier::for_percentage(75),
        percentage: 75,
        score: 3,
        total_questions: 4,
        lives_left: 2,
    };
    let html = render_screen(ScreenKind::Results(results));
    assert!(html.contains("3 out of 4 correct"), "missing score in {html}");
    assert!(html.contains("75%"), "missing percentage in {html}");
    assert!(html.contains("Back to Lessons"), "missing back button in {html}");
    assert!(!html.contains("Return Home"), "home shown to a learner in {html}");
}

#[test]
fn lesson_list_smoke_renders_cards() {
    let mut profile = UserProfile::new(UserId::new("kid"), "Kid", false);
    profile.progress.insert(LessonId::new("b"), 90);
    let cards = map_lesson_cards(&[lesson("a", "Sharing"), lesson("b", "Kindness")], &profile);

    let html = render_screen(ScreenKind::Lessons(cards));
    assert!(html.contains("Sharing"), "missing title in {html}");
    assert!(html.contains("Start Lesson"), "missing start label in {html}");
    assert!(html.contains("Retake Lesson"), "missing retake label in {html}");
    assert!(html.contains("width: 90%"), "missing progress bar in {html}");
}

#[test]
fn admin_view_smoke_renders_form_and_lessons() {
    let profile = UserProfile::new(UserId::new("boss"), "Boss", true);
    let lessons = map_lesson_cards(&[lesson("a", "Sharing")], &profile);

    let html = render_screen(ScreenKind::Admin {
        lessons,
        form: Some(LessonFormVm::blank()),
    });
    assert!(html.contains("Add New Lesson"), "missing form heading in {html}");
    assert!(html.contains("Add Lesson"), "missing save label in {html}");
    assert!(html.contains("Sharing"), "missing lesson row in {html}");
    assert!(html.contains("Question 1"), "missing question fields in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_lessons_for_a_learner() {
    let repo = InMemoryRepository::new();
    repo.upsert_lesson(&lesson("a", "Sharing")).await.unwrap();
    let uid = UserId::new("kid");
    let profile = UserProfile::new(uid.clone(), "Kid", false);

    let mut harness = setup_home_harness(repo, Some(profile), Some(uid)).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Choose Your Learning Path"), "missing lesson list in {html}");
    assert!(html.contains("Welcome, Kid"), "missing header in {html}");
    assert!(html.contains("Start Lesson"), "missing card in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_mode_selection_for_an_admin() {
    let uid = UserId::new("boss");
    let profile = UserProfile::new(uid.clone(), "Boss", true);

    let mut harness = setup_home_harness(InMemoryRepository::new(), Some(profile), Some(uid)).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Choose Your Mode"), "missing mode selection in {html}");
    assert!(html.contains("Admin Panel"), "missing admin option in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_missing_identity() {
    let mut harness = setup_home_harness(InMemoryRepository::new(), None, None).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No user id given"), "missing identity error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_access_denied() {
    let mut harness =
        setup_home_harness(InMemoryRepository::new(), None, Some(UserId::new("ghost"))).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Access denied"), "missing denial in {html}");
}
