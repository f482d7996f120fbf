// src/handlers/completions.rs

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::IntoResponse,
};
use serde_json::json;

use crate::{error::AppError, models::completion::CompleteQuestionRequest, store::CompletionTracker};

/// Marks a question as completed by a user.
pub async fn complete_question(
    State(tracker): State<CompletionTracker>,
    payload: Result<Json<CompleteQuestionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;

    let id = tracker.record(req).await?;

    Ok(Json(json!({ "message": "Question completed", "id": id })))
}

/// Lists a user's completed questions with their paper metadata.
pub async fn completed_questions(
    State(tracker): State<CompletionTracker>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(user_id) = user_id?;

    Ok(Json(tracker.for_user(user_id).await?))
}
