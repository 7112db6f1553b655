use std::collections::BTreeMap;

use chrono::Utc;
use quiz_core::model::{LessonId, UserId, UserProfile};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, i64_from_u64, percentage_from_i64, ser, u64_from_i64};
use crate::repository::{StorageError, UserRepository};

#[async_trait::async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: &UserId) -> Result<Option<UserProfile>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, name, admin, total_score, lessons_completed
            FROM users WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let progress_rows = sqlx::query(
            r"
            SELECT lesson_id, percentage
            FROM user_progress
            WHERE user_id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut progress = BTreeMap::new();
        for p in &progress_rows {
            let lesson_id: String = p.try_get("lesson_id").map_err(ser)?;
            let percentage = percentage_from_i64(p.try_get::<i64, _>("percentage").map_err(ser)?)?;
            progress.insert(LessonId::new(lesson_id), percentage);
        }

        Ok(Some(UserProfile {
            id: UserId::new(row.try_get::<String, _>("id").map_err(ser)?),
            name: row.try_get("name").map_err(ser)?,
            admin: row.try_get::<i64, _>("admin").map_err(ser)? != 0,
            progress,
            total_score: u64_from_i64(
                "total_score",
                row.try_get::<i64, _>("total_score").map_err(ser)?,
            )?,
            lessons_completed: u64_from_i64(
                "lessons_completed",
                row.try_get::<i64, _>("lessons_completed").map_err(ser)?,
            )?,
        }))
    }

    async fn upsert_user(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        let admin = i64::from(profile.admin);

        sqlx::query(
            r"
            INSERT INTO users (id, name, admin, total_score, lessons_completed)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                admin = excluded.admin,
                total_score = excluded.total_score,
                lessons_completed = excluded.lessons_completed
            ",
        )
        .bind(profile.id.as_str())
        .bind(profile.name.as_str())
        .bind(admin)
        .bind(i64_from_u64("total_score", profile.total_score)?)
        .bind(i64_from_u64("lessons_completed", profile.lessons_completed)?)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        sqlx::query("DELETE FROM user_progress WHERE user_id = ?1")
            .bind(profile.id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        let now = Utc::now();
        for (lesson_id, percentage) in &profile.progress {
            sqlx::query(
                r"
                INSERT INTO user_progress (user_id, lesson_id, percentage, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ",
            )
            .bind(profile.id.as_str())
            .bind(lesson_id.as_str())
            .bind(i64::from(*percentage))
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
