// src/handlers/users.rs

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{error::AppError, models::user::CreateUserRequest, store::UserStore};

pub async fn list_users(State(store): State<UserStore>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.list().await?))
}

pub async fn create_user(
    State(store): State<UserStore>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;

    let id = store.create(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created", "id": id })),
    ))
}

/// Deletes a user. Their completion records are removed by cascade.
pub async fn delete_user(
    State(store): State<UserStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;

    store.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
