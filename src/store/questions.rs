// src/store/questions.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    error::AppError,
    models::question::{NewQuestion, Question, QuestionFilter, QuestionSubmission, StoredImage},
    utils::data_uri::encode_image_data_uri,
};

const QUESTION_COLUMNS: &str = "id, year_of_paper, subject, topic, paper, question_number, \
                                question, points_available, time_available, image_type";

/// CRUD and random sampling over the `questions` table.
#[derive(Debug, Clone)]
pub struct QuestionStore {
    pool: SqlitePool,
}

impl QuestionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns every question in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Question>, AppError> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {} FROM questions ORDER BY id",
            QUESTION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list questions: {:?}", e);
            AppError::from(e)
        })?;

        Ok(questions)
    }

    /// Draws up to `filter.limit` random questions matching every supplied filter.
    ///
    /// A `None` text filter places no constraint on its column. Order and
    /// membership differ from call to call.
    pub async fn random_sample(&self, filter: &QuestionFilter) -> Result<Vec<Question>, AppError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM questions
            WHERE
                (year_of_paper = ? OR ? IS NULL)
                AND (subject = ? OR ? IS NULL)
                AND (topic = ? OR ? IS NULL)
                AND points_available >= ?
            ORDER BY RANDOM()
            LIMIT ?
            "#,
            QUESTION_COLUMNS
        );

        let questions = sqlx::query_as::<_, Question>(&sql)
            .bind(filter.year.as_deref())
            .bind(filter.year.as_deref())
            .bind(filter.subject.as_deref())
            .bind(filter.subject.as_deref())
            .bind(filter.topic.as_deref())
            .bind(filter.topic.as_deref())
            .bind(filter.min_points)
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to sample questions: {:?}", e);
                AppError::from(e)
            })?;

        Ok(questions)
    }

    /// Validates a submission and stores it, returning the new question id.
    pub async fn insert(&self, submission: QuestionSubmission) -> Result<i64, AppError> {
        let question = submission.into_new_question()?;

        let id = insert_question(&self.pool, &question).await.map_err(|e| {
            tracing::error!("Failed to insert question: {:?}", e);
            AppError::from(e)
        })?;

        tracing::info!(
            id,
            subject = %question.subject,
            paper = %question.paper,
            question_number = question.question_number,
            "Question added"
        );
        Ok(id)
    }

    /// Returns the stored image of a question as a data URI labelled with its
    /// real subtype.
    pub async fn get_image(&self, id: i64) -> Result<String, AppError> {
        let stored = sqlx::query_as::<_, StoredImage>(
            "SELECT question, image_type FROM questions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match stored {
            Some(StoredImage {
                question: Some(bytes),
                image_type,
            }) if !bytes.is_empty() => Ok(encode_image_data_uri(&image_type, &bytes)),
            _ => Err(AppError::NotFound("Image not found".to_string())),
        }
    }

    /// Deletes a question; its completion records go with it.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete question: {:?}", e);
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Question not found".to_string()));
        }

        Ok(())
    }
}

/// Inserts one validated question through any executor, so the same
/// statement serves both the pool and an open transaction.
pub(crate) async fn insert_question<'e, E>(executor: E, question: &NewQuestion) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO questions
        (year_of_paper, subject, topic, paper, question, points_available, time_available, question_number, image_type)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&question.year_of_paper)
    .bind(&question.subject)
    .bind(&question.topic)
    .bind(&question.paper)
    .bind(&question.image.bytes)
    .bind(question.points_available)
    .bind(question.time_available)
    .bind(question.question_number)
    .bind(&question.image.subtype)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}
