// src/store/users.rs

use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{CreateUserRequest, User},
    utils::hash::hash_password,
};

#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, password, user_token, token_expiration FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::from(e)
        })?;

        Ok(users)
    }

    /// Creates a user, storing only a hash of the password.
    pub async fn create(&self, req: CreateUserRequest) -> Result<i64, AppError> {
        req.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let hashed_password = hash_password(&req.password)?;

        let result = sqlx::query("INSERT INTO users (email, password) VALUES (?, ?)")
            .bind(&req.email)
            .bind(hashed_password)
            .execute(&self.pool)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => {
                    AppError::Conflict(format!("Email '{}' already exists", req.email))
                }
                other => other,
            })?;

        Ok(result.last_insert_rowid())
    }

    /// Deletes a user together with their completion records.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user: {:?}", e);
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }
}
