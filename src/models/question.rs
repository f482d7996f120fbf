// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::{
    error::AppError,
    utils::data_uri::{DecodedImage, encode_image_data_uri, parse_image_data_uri},
};

/// Limit applied to a random sample when the caller gives none.
pub const DEFAULT_SAMPLE_LIMIT: i64 = 10;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: i64,
    pub year_of_paper: String,
    pub subject: String,
    pub topic: String,

    /// e.g. "Paper 2". `question_number` is only meaningful within a paper.
    pub paper: String,
    pub question_number: i64,

    /// Raw JPEG or PNG bytes.
    pub question: Vec<u8>,

    pub points_available: i64,

    /// Seconds.
    pub time_available: i64,

    /// Subtype of `question`, "jpeg" or "png".
    pub image_type: String,
}

/// DTO for sending a question to the client, with the image inlined as a data URI.
#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub id: i64,
    pub year_of_paper: String,
    pub subject: String,
    pub topic: String,
    pub paper: String,
    pub question_number: i64,
    pub question: String,
    pub points_available: i64,
    pub time_available: i64,
}

impl From<Question> for QuestionResponse {
    fn from(q: Question) -> Self {
        Self {
            question: encode_image_data_uri(&q.image_type, &q.question),
            id: q.id,
            year_of_paper: q.year_of_paper,
            subject: q.subject,
            topic: q.topic,
            paper: q.paper,
            question_number: q.question_number,
            points_available: q.points_available,
            time_available: q.time_available,
        }
    }
}

/// Image payload and subtype as stored.
#[derive(Debug, FromRow)]
pub struct StoredImage {
    pub question: Option<Vec<u8>>,
    pub image_type: String,
}

/// DTO for returning a question image.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageResponse {
    pub image: String,
}

/// A question as submitted by a client, one entry of a bulk upload or the
/// body of a single upload.
///
/// Every field is optional at the serde level so that an absent field is
/// reported as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct QuestionSubmission {
    pub year_of_paper: Option<String>,
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub paper: Option<String>,
    #[validate(range(min = 0, message = "points_available must not be negative"))]
    pub points_available: Option<i64>,
    #[validate(range(min = 0, message = "time_available must not be negative"))]
    pub time_available: Option<i64>,
    pub question_number: Option<i64>,
    /// `data:image/<jpeg|png>;base64,<payload>`
    pub question_image: Option<String>,
}

/// A fully validated question ready to insert.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub year_of_paper: String,
    pub subject: String,
    pub topic: String,
    pub paper: String,
    pub question_number: i64,
    pub points_available: i64,
    pub time_available: i64,
    pub image: DecodedImage,
}

impl QuestionSubmission {
    /// Runs the full validation sequence: required fields, numeric ranges,
    /// then the image data URI.
    pub fn into_new_question(self) -> Result<NewQuestion, AppError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields or image: {}",
                missing.join(", ")
            )));
        }

        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // Presence of every field was checked above.
        let (
            Some(year_of_paper),
            Some(subject),
            Some(topic),
            Some(paper),
            Some(points_available),
            Some(time_available),
            Some(question_number),
            Some(question_image),
        ) = (
            self.year_of_paper,
            self.subject,
            self.topic,
            self.paper,
            self.points_available,
            self.time_available,
            self.question_number,
            self.question_image,
        )
        else {
            return Err(AppError::Validation(
                "Missing required fields or image".to_string(),
            ));
        };

        let image = parse_image_data_uri(&question_image)?;

        Ok(NewQuestion {
            year_of_paper,
            subject,
            topic,
            paper,
            question_number,
            points_available,
            time_available,
            image,
        })
    }

    /// Names of required fields that are absent, null, or empty strings.
    /// Zero is a valid value for the numeric fields.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let text = [
            ("year_of_paper", &self.year_of_paper),
            ("subject", &self.subject),
            ("topic", &self.topic),
            ("paper", &self.paper),
        ];
        let numbers = [
            ("points_available", self.points_available),
            ("time_available", self.time_available),
            ("question_number", self.question_number),
        ];

        let mut missing: Vec<&'static str> = text
            .iter()
            .filter(|(_, v)| v.as_deref().is_none_or(str::is_empty))
            .map(|(name, _)| *name)
            .collect();
        missing.extend(
            numbers
                .iter()
                .filter(|(_, v)| v.is_none())
                .map(|(name, _)| *name),
        );
        if self.question_image.as_deref().is_none_or(str::is_empty) {
            missing.push("question_image");
        }
        missing
    }
}

/// Query parameters for `/random-questions`, exactly as received.
#[derive(Debug, Default, Deserialize)]
pub struct RandomQuestionParams {
    pub year: Option<String>,
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub min_points: Option<String>,
    pub limit: Option<String>,
}

/// Constraints for random sampling. `None` text fields match every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionFilter {
    pub year: Option<String>,
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub min_points: i64,
    pub limit: i64,
}

impl Default for QuestionFilter {
    fn default() -> Self {
        Self {
            year: None,
            subject: None,
            topic: None,
            min_points: 0,
            limit: DEFAULT_SAMPLE_LIMIT,
        }
    }
}

impl TryFrom<RandomQuestionParams> for QuestionFilter {
    type Error = AppError;

    /// Empty values count as absent.
    fn try_from(params: RandomQuestionParams) -> Result<Self, Self::Error> {
        Ok(Self {
            year: non_empty(params.year),
            subject: non_empty(params.subject),
            topic: non_empty(params.topic),
            min_points: parse_non_negative("min_points", params.min_points)?.unwrap_or(0),
            limit: parse_non_negative("limit", params.limit)?.unwrap_or(DEFAULT_SAMPLE_LIMIT),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_non_negative(name: &str, value: Option<String>) -> Result<Option<i64>, AppError> {
    let Some(raw) = non_empty(value) else {
        return Ok(None);
    };
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 0 => Ok(Some(n)),
        _ => Err(AppError::Validation(format!(
            "{} must be a non-negative integer, got {:?}",
            name, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==";

    fn complete() -> QuestionSubmission {
        QuestionSubmission {
            year_of_paper: Some("2021".into()),
            subject: Some("Physics".into()),
            topic: Some("SHM".into()),
            paper: Some("Paper 2".into()),
            points_available: Some(0),
            time_available: Some(0),
            question_number: Some(1),
            question_image: Some(PNG_URI.into()),
        }
    }

    #[test]
    fn zero_numbers_are_present() {
        let q = complete().into_new_question().unwrap();
        assert_eq!(q.points_available, 0);
        assert_eq!(q.image.subtype, "png");
    }

    #[test]
    fn empty_strings_and_nulls_are_missing() {
        let submission = QuestionSubmission {
            subject: Some(String::new()),
            question_number: None,
            ..complete()
        };
        assert_eq!(
            submission.missing_fields(),
            vec!["subject", "question_number"]
        );
        assert!(matches!(
            submission.into_new_question(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn negative_points_are_rejected() {
        let submission = QuestionSubmission {
            points_available: Some(-1),
            ..complete()
        };
        assert!(matches!(
            submission.into_new_question(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn missing_fields_win_over_bad_image() {
        let submission = QuestionSubmission {
            topic: None,
            question_image: Some("not a uri".into()),
            ..complete()
        };
        assert!(matches!(
            submission.into_new_question(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn filter_defaults() {
        let filter = QuestionFilter::try_from(RandomQuestionParams::default()).unwrap();
        assert_eq!(filter, QuestionFilter::default());
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.min_points, 0);
    }

    #[test]
    fn filter_treats_empty_values_as_absent() {
        let filter = QuestionFilter::try_from(RandomQuestionParams {
            year: Some(String::new()),
            subject: Some("Math".into()),
            limit: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.year, None);
        assert_eq!(filter.subject.as_deref(), Some("Math"));
        assert_eq!(filter.limit, DEFAULT_SAMPLE_LIMIT);
    }

    #[test]
    fn filter_rejects_bad_numbers() {
        for bad in ["abc", "-1", "1.5"] {
            let result = QuestionFilter::try_from(RandomQuestionParams {
                limit: Some(bad.into()),
                ..Default::default()
            });
            assert!(matches!(result, Err(AppError::Validation(_))), "{bad}");
        }
    }
}
