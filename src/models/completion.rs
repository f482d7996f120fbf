// src/models/completion.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// DTO for marking a question as completed.
///
/// Fields are optional so that a missing value surfaces as a validation
/// error. Zero is a valid `time_taken` or `marks_scored`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CompleteQuestionRequest {
    pub user_id: Option<i64>,
    pub question_id: Option<i64>,
    pub time_taken: Option<i64>,
    pub marks_scored: Option<i64>,
}

/// A validated completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCompletion {
    pub user_id: i64,
    pub question_id: i64,
    /// Seconds.
    pub time_taken: i64,
    pub marks_scored: i64,
}

impl TryFrom<CompleteQuestionRequest> for NewCompletion {
    type Error = AppError;

    fn try_from(req: CompleteQuestionRequest) -> Result<Self, Self::Error> {
        // Row ids start at 1, so an id of 0 is as good as missing.
        let user_id = req.user_id.filter(|id| *id != 0);
        let question_id = req.question_id.filter(|id| *id != 0);

        match (user_id, question_id, req.time_taken, req.marks_scored) {
            (Some(user_id), Some(question_id), Some(time_taken), Some(marks_scored)) => Ok(Self {
                user_id,
                question_id,
                time_taken,
                marks_scored,
            }),
            _ => Err(AppError::Validation("Missing required fields".to_string())),
        }
    }
}

/// SQLite's `CURRENT_TIMESTAMP` text format.
pub const COMPLETED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A completion record joined with the metadata of its question.
/// Represents a row joined from `user_questions` and `questions`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CompletedQuestion {
    /// Id of the completed question.
    pub id: i64,
    /// Id of the completion record itself.
    pub completion_id: i64,
    pub year_of_paper: String,
    pub subject: String,
    pub topic: String,
    pub points_available: i64,
    pub time_available: i64,
    #[serde(serialize_with = "serialize_completed_at")]
    pub completed_at: Option<NaiveDateTime>,
    pub time_taken: i64,
    pub marks_scored: i64,
}

fn serialize_completed_at<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(at) => serializer.collect_str(&at.format(COMPLETED_AT_FORMAT)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_at_keeps_sqlite_timestamp_format() {
        let row = CompletedQuestion {
            id: 3,
            completion_id: 1,
            year_of_paper: "2021".into(),
            subject: "Physics".into(),
            topic: "SHM".into(),
            points_available: 4,
            time_available: 60,
            completed_at: NaiveDateTime::parse_from_str("2026-10-19 02:54:43", COMPLETED_AT_FORMAT)
                .ok(),
            time_taken: 30,
            marks_scored: 2,
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["completed_at"], "2026-10-19 02:54:43");
        assert_eq!(json["id"], 3);
        assert_eq!(json["completion_id"], 1);

        let unset = CompletedQuestion {
            completed_at: None,
            ..row
        };
        assert!(serde_json::to_value(&unset).unwrap()["completed_at"].is_null());
    }

    #[test]
    fn zero_scores_are_accepted() {
        let completion = NewCompletion::try_from(CompleteQuestionRequest {
            user_id: Some(1),
            question_id: Some(2),
            time_taken: Some(0),
            marks_scored: Some(0),
        })
        .unwrap();
        assert_eq!(completion.marks_scored, 0);
        assert_eq!(completion.time_taken, 0);
    }

    #[test]
    fn absent_fields_are_rejected() {
        let req = CompleteQuestionRequest {
            user_id: Some(1),
            question_id: Some(2),
            time_taken: Some(30),
            marks_scored: None,
        };
        assert!(matches!(
            NewCompletion::try_from(req),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn zero_ids_are_rejected() {
        let req = CompleteQuestionRequest {
            user_id: Some(0),
            question_id: Some(2),
            time_taken: Some(30),
            marks_scored: Some(3),
        };
        assert!(NewCompletion::try_from(req).is_err());
    }
}
