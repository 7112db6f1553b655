use quiz_core::model::{Difficulty, Lesson, LessonId, Question};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn u64_from_i64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn i64_from_u64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn percentage_from_i64(v: i64) -> Result<u8, StorageError> {
    u8::try_from(v)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or_else(|| StorageError::Serialization(format!("invalid percentage: {v}")))
}

pub(crate) fn parse_difficulty(s: &str) -> Result<Difficulty, StorageError> {
    s.parse::<Difficulty>().map_err(ser)
}

/// Answers are stored as a JSON array in a single column.
pub(crate) fn answers_to_json(question: &Question) -> Result<String, StorageError> {
    serde_json::to_string(question.answers()).map_err(ser)
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<Question, StorageError> {
    let prompt: String = row.try_get("prompt").map_err(ser)?;
    let answers_json: String = row.try_get("answers").map_err(ser)?;
    let answers: Vec<String> = serde_json::from_str(&answers_json).map_err(ser)?;
    let correct: i64 = row.try_get("correct_answer").map_err(ser)?;
    let correct = usize::try_from(correct)
        .map_err(|_| StorageError::Serialization(format!("invalid correct_answer: {correct}")))?;

    Question::new(prompt, answers, correct).map_err(ser)
}

pub(crate) fn map_lesson_row(
    row: &SqliteRow,
    questions: Vec<Question>,
) -> Result<Lesson, StorageError> {
    let difficulty: String = row.try_get("difficulty").map_err(ser)?;

    Lesson::new(
        LessonId::new(row.try_get::<String, _>("id").map_err(ser)?),
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get::<String, _>("description").map_err(ser)?,
        row.try_get::<String, _>("category").map_err(ser)?,
        parse_difficulty(&difficulty)?,
        questions,
    )
    .map_err(ser)
}
