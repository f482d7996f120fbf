// src/store/bulk.rs

use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::question::{NewQuestion, QuestionSubmission},
    store::questions::insert_question,
};

/// All-or-nothing ingestion of a batch of questions.
#[derive(Debug, Clone)]
pub struct BulkIngest {
    pool: SqlitePool,
}

impl BulkIngest {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Validates and inserts every question of `batch` inside one transaction.
    ///
    /// * Anything other than a non-empty JSON array is rejected before a
    ///   transaction is opened.
    /// * Each item goes through the same validation as a single upload and,
    ///   if valid, is inserted straight away. Every item is checked so that
    ///   all failures end up in the log.
    /// * If any item failed, the transaction is rolled back and nothing from
    ///   the batch persists.
    ///
    /// Returns the ids of the inserted questions, in input order.
    pub async fn ingest(&self, batch: Value) -> Result<Vec<i64>, AppError> {
        let items = match batch {
            Value::Array(items) if !items.is_empty() => items,
            _ => {
                tracing::error!("Invalid data format, expected an array of questions.");
                return Err(AppError::Validation(
                    "Invalid data format, expected an array of questions.".to_string(),
                ));
            }
        };
        let total = items.len();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Transaction(e.to_string()))?;

        let mut ids = Vec::with_capacity(total);
        let mut failed = 0usize;

        for (index, item) in items.into_iter().enumerate() {
            let position = index + 1;

            let question = match validate_item(item) {
                Ok(question) => question,
                Err(e) => {
                    tracing::warn!("Question {} of {} rejected: {}", position, total, e);
                    failed += 1;
                    continue;
                }
            };

            // Awaited before the next item is looked at, so no insert can
            // land after the commit/rollback decision below.
            match insert_question(&mut *tx, &question).await {
                Ok(id) => ids.push(id),
                Err(e) => {
                    tracing::error!("Error inserting question {}: {:?}", position, e);
                    rollback(tx).await?;
                    return Err(AppError::from(e));
                }
            }
        }

        if failed > 0 {
            rollback(tx).await?;
            tracing::warn!(
                failed,
                total,
                "Bulk upload rejected, transaction rolled back"
            );
            return Err(AppError::BatchValidation(
                "One or more questions have invalid data or images.".to_string(),
            ));
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Transaction commit failed: {:?}", e);
            AppError::Transaction(e.to_string())
        })?;

        tracing::info!(count = ids.len(), "Bulk upload successful");
        Ok(ids)
    }
}

fn validate_item(item: Value) -> Result<NewQuestion, AppError> {
    serde_json::from_value::<QuestionSubmission>(item)?.into_new_question()
}

async fn rollback(tx: sqlx::Transaction<'_, sqlx::Sqlite>) -> Result<(), AppError> {
    tx.rollback().await.map_err(|e| {
        tracing::error!("Transaction rollback failed: {:?}", e);
        AppError::Transaction(e.to_string())
    })
}
