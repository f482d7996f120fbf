// src/handlers/questions.rs

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::{
    error::AppError,
    models::question::{
        ImageResponse, QuestionFilter, QuestionResponse, QuestionSubmission, RandomQuestionParams,
    },
    store::{BulkIngest, QuestionStore},
};

/// Lists every question, images inlined as data URIs.
pub async fn list_questions(
    State(store): State<QuestionStore>,
) -> Result<impl IntoResponse, AppError> {
    let questions: Vec<QuestionResponse> = store
        .list_all()
        .await?
        .into_iter()
        .map(QuestionResponse::from)
        .collect();

    Ok(Json(questions))
}

/// Returns a random selection of questions.
///
/// Accepts `year`, `subject`, `topic`, `min_points` and `limit` query
/// parameters; any of them may be left out.
pub async fn random_questions(
    State(store): State<QuestionStore>,
    params: Result<Query<RandomQuestionParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let filter = QuestionFilter::try_from(params)?;

    let questions: Vec<QuestionResponse> = store
        .random_sample(&filter)
        .await?
        .into_iter()
        .map(QuestionResponse::from)
        .collect();

    Ok(Json(questions))
}

/// Adds a single question with a base64 image.
pub async fn add_question(
    State(store): State<QuestionStore>,
    payload: Result<Json<QuestionSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(submission) = payload?;

    let id = store.insert(submission).await?;

    Ok(Json(json!({ "message": "Question added successfully", "id": id })))
}

/// Adds a batch of questions. Either all of them are stored or none.
pub async fn bulk_upload_questions(
    State(bulk): State<BulkIngest>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(batch) = payload?;

    let ids = bulk.ingest(batch).await?;

    Ok(Json(json!({
        "message": "Bulk upload successful!",
        "count": ids.len(),
    })))
}

pub async fn question_image(
    State(store): State<QuestionStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;

    let image = store.get_image(id).await?;

    Ok(Json(ImageResponse { image }))
}

/// Deletes a question along with every completion record that references it.
pub async fn delete_question(
    State(store): State<QuestionStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;

    store.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
