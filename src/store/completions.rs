// src/store/completions.rs

use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::completion::{CompleteQuestionRequest, CompletedQuestion, NewCompletion},
};

/// Records which questions a user has completed. Users and questions are
/// referenced, never modified.
#[derive(Debug, Clone)]
pub struct CompletionTracker {
    pool: SqlitePool,
}

impl CompletionTracker {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stores one completion event and returns its id.
    ///
    /// Fails with `AppError::ForeignKey` when the user or question does not
    /// exist; no row is written in that case.
    pub async fn record(&self, req: CompleteQuestionRequest) -> Result<i64, AppError> {
        let completion = NewCompletion::try_from(req)?;

        let result = sqlx::query(
            r#"
            INSERT INTO user_questions (user_id, question_id, time_taken, marks_scored)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(completion.user_id)
        .bind(completion.question_id)
        .bind(completion.time_taken)
        .bind(completion.marks_scored)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let err = AppError::from(e);
            if !matches!(err, AppError::ForeignKey(_)) {
                tracing::error!("Failed to record completion: {}", err);
            }
            err
        })?;

        Ok(result.last_insert_rowid())
    }

    /// All completions of a user, each joined with its question's metadata.
    pub async fn for_user(&self, user_id: i64) -> Result<Vec<CompletedQuestion>, AppError> {
        let completed = sqlx::query_as::<_, CompletedQuestion>(
            r#"
            SELECT
                q.id,
                uq.id AS completion_id,
                q.year_of_paper,
                q.subject,
                q.topic,
                q.points_available,
                q.time_available,
                uq.completed_at,
                uq.time_taken,
                uq.marks_scored
            FROM user_questions uq
            JOIN questions q ON uq.question_id = q.id
            WHERE uq.user_id = ?
            ORDER BY uq.completed_at, uq.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch completed questions: {:?}", e);
            AppError::from(e)
        })?;

        Ok(completed)
    }
}
