use std::collections::HashMap;

use quiz_core::model::{Lesson, LessonId, Question};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{answers_to_json, conn, map_lesson_row, map_question_row, ser};
use crate::repository::{LessonRepository, StorageError};

#[async_trait::async_trait]
impl LessonRepository for SqliteRepository {
    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError> {
        let lesson_rows = sqlx::query(
            r"
            SELECT id, title, description, category, difficulty
            FROM lessons
            ORDER BY seq ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let question_rows = sqlx::query(
            r"
            SELECT lesson_id, prompt, answers, correct_answer
            FROM questions
            ORDER BY lesson_id ASC, position ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut questions: HashMap<String, Vec<Question>> = HashMap::new();
        for row in &question_rows {
            let lesson_id: String = row.try_get("lesson_id").map_err(ser)?;
            questions
                .entry(lesson_id)
                .or_default()
                .push(map_question_row(row)?);
        }

        let mut lessons = Vec::with_capacity(lesson_rows.len());
        for row in &lesson_rows {
            let id: String = row.try_get("id").map_err(ser)?;
            let qs = questions.remove(&id).unwrap_or_default();
            lessons.push(map_lesson_row(row, qs)?);
        }
        Ok(lessons)
    }

    async fn get_lesson(&self, id: &LessonId) -> Result<Option<Lesson>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, description, category, difficulty
            FROM lessons WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let question_rows = sqlx::query(
            r"
            SELECT prompt, answers, correct_answer
            FROM questions
            WHERE lesson_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let questions = question_rows
            .iter()
            .map(map_question_row)
            .collect::<Result<Vec<_>, _>>()?;

        map_lesson_row(&row, questions).map(Some)
    }

    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO lessons (id, title, description, category, difficulty)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                category = excluded.category,
                difficulty = excluded.difficulty
            ",
        )
        .bind(lesson.id().as_str())
        .bind(lesson.title())
        .bind(lesson.description())
        .bind(lesson.category())
        .bind(lesson.difficulty().as_str())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        // Questions are replaced wholesale so reordering and removal persist.
        sqlx::query("DELETE FROM questions WHERE lesson_id = ?1")
            .bind(lesson.id().as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, question) in lesson.questions().iter().enumerate() {
            let position = i64::try_from(position)
                .map_err(|_| StorageError::Serialization("position overflow".into()))?;
            let correct = i64::try_from(question.correct_answer())
                .map_err(|_| StorageError::Serialization("correct_answer overflow".into()))?;
            sqlx::query(
                r"
                INSERT INTO questions (lesson_id, position, prompt, answers, correct_answer)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ",
            )
            .bind(lesson.id().as_str())
            .bind(position)
            .bind(question.prompt())
            .bind(answers_to_json(question)?)
            .bind(correct)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn delete_lesson(&self, id: &LessonId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM lessons WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
