use chrono::Utc;
use quiz_core::model::{ProgressUpdate, UserId};

use super::SqliteRepository;
use super::mapping::conn;
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn apply_completion(
        &self,
        user_id: &UserId,
        update: &ProgressUpdate,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let res = sqlx::query(
            r"
            UPDATE users
            SET total_score = total_score + ?2,
                lessons_completed = lessons_completed + 1
            WHERE id = ?1
            ",
        )
        .bind(user_id.as_str())
        .bind(i64::from(update.score))
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            // Dropping the transaction rolls it back.
            return Err(StorageError::NotFound);
        }

        sqlx::query(
            r"
            INSERT INTO user_progress (user_id, lesson_id, percentage, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, lesson_id) DO UPDATE SET
                percentage = excluded.percentage,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user_id.as_str())
        .bind(update.lesson_id.as_str())
        .bind(i64::from(update.percentage))
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        tracing::debug!(
            user = %user_id,
            lesson = %update.lesson_id,
            percentage = update.percentage,
            "recorded lesson completion"
        );
        Ok(())
    }
}
