use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

pub const QUESTION_COUNT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub entry_id: i64,
    pub entry_date: String,
    pub q1: i64,
    pub q2: i64,
    pub q3: i64,
    pub q4: i64,
    pub q5: i64,
    pub q6: i64,
    pub q7: i64,
    pub q8: i64,
    pub q9: i64,
    pub q10: i64,
    #[serde(rename = "moodScore")]
    #[sqlx(rename = "moodScore")]
    pub mood_score: i64,
    pub response: String,
}

impl JournalEntry {
    pub fn scores(&self) -> [i64; QUESTION_COUNT] {
        [
            self.q1, self.q2, self.q3, self.q4, self.q5, self.q6, self.q7, self.q8, self.q9,
            self.q10,
        ]
    }
}

/// The slice of an entry the recommendation prompt is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentEntry {
    pub entry_id: i64,
    pub scores: [i64; QUESTION_COUNT],
    pub response: String,
}

impl RecentEntry {
    /// Plain mean of the ten answers. Independent of the stored `moodScore`.
    pub fn average_score(&self) -> f64 {
        average(&self.scores)
    }
}

impl From<JournalEntry> for RecentEntry {
    fn from(entry: JournalEntry) -> Self {
        Self {
            entry_id: entry.entry_id,
            scores: entry.scores(),
            response: entry.response,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewEntry {
    pub entry_date: String,
    pub scores: [i64; QUESTION_COUNT],
    pub mood_score: i64,
    pub response: String,
}

/// POST /journal
///
/// Every field is optional at the wire level so a missing one turns into a
/// 400 naming the field instead of a generic deserialization failure.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEntryRequest {
    #[validate(required)]
    pub entry_date: Option<String>,
    #[validate(required)]
    pub q1: Option<i64>,
    #[validate(required)]
    pub q2: Option<i64>,
    #[validate(required)]
    pub q3: Option<i64>,
    #[validate(required)]
    pub q4: Option<i64>,
    #[validate(required)]
    pub q5: Option<i64>,
    #[validate(required)]
    pub q6: Option<i64>,
    #[validate(required)]
    pub q7: Option<i64>,
    #[validate(required)]
    pub q8: Option<i64>,
    #[validate(required)]
    pub q9: Option<i64>,
    #[validate(required)]
    pub q10: Option<i64>,
    #[serde(rename = "moodScore")]
    #[validate(required)]
    pub mood_score: Option<i64>,
    #[validate(required)]
    pub response: Option<String>,
}

impl TryFrom<CreateEntryRequest> for NewEntry {
    type Error = AppError;

    fn try_from(body: CreateEntryRequest) -> Result<Self, Self::Error> {
        body.validate().map_err(missing_fields)?;

        let missing = || AppError::Validation("Missing required field".into());
        Ok(Self {
            entry_date: body.entry_date.ok_or_else(missing)?,
            scores: [
                body.q1.ok_or_else(missing)?,
                body.q2.ok_or_else(missing)?,
                body.q3.ok_or_else(missing)?,
                body.q4.ok_or_else(missing)?,
                body.q5.ok_or_else(missing)?,
                body.q6.ok_or_else(missing)?,
                body.q7.ok_or_else(missing)?,
                body.q8.ok_or_else(missing)?,
                body.q9.ok_or_else(missing)?,
                body.q10.ok_or_else(missing)?,
            ],
            mood_score: body.mood_score.ok_or_else(missing)?,
            response: body.response.ok_or_else(missing)?,
        })
    }
}

fn missing_fields(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<&str> = errors.field_errors().into_keys().collect();
    fields.sort_unstable();
    AppError::Validation(format!("Missing required field: {}", fields.join(", ")))
}

/// POST /analyze
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(required)]
    pub q1: Option<i64>,
    #[validate(required)]
    pub q2: Option<i64>,
    #[validate(required)]
    pub q3: Option<i64>,
    #[validate(required)]
    pub q4: Option<i64>,
    #[validate(required)]
    pub q5: Option<i64>,
    #[validate(required)]
    pub q6: Option<i64>,
    #[validate(required)]
    pub q7: Option<i64>,
    #[validate(required)]
    pub q8: Option<i64>,
    #[validate(required)]
    pub q9: Option<i64>,
    #[validate(required)]
    pub q10: Option<i64>,
}

impl AnalyzeRequest {
    pub fn scores(&self) -> Result<[i64; QUESTION_COUNT], AppError> {
        self.validate().map_err(missing_fields)?;
        let values = [
            self.q1, self.q2, self.q3, self.q4, self.q5, self.q6, self.q7, self.q8, self.q9,
            self.q10,
        ];
        let mut scores = [0; QUESTION_COUNT];
        for (slot, value) in scores.iter_mut().zip(values) {
            *slot = value.ok_or_else(|| AppError::Validation("Missing required field".into()))?;
        }
        Ok(scores)
    }
}

/// POST /submit: raw questionnaire answers, as sent by the mobile client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub question_values: Vec<i64>,
    #[serde(default)]
    pub response: Option<String>,
}

/// Weight of each question in the submitted mood score. Sums to 25.
pub const QUESTION_WEIGHTS: [i64; QUESTION_COUNT] = [4, 1, 4, 4, 2, 2, 2, 1, 1, 4];

/// Zero-based index of the reverse-scored question.
const REVERSED_QUESTION: usize = 2;

/// Scores are unbounded integers, so the arithmetic runs in `f64`.
pub fn average(scores: &[i64; QUESTION_COUNT]) -> f64 {
    scores.iter().map(|&s| s as f64).sum::<f64>() / QUESTION_COUNT as f64
}

/// Weighted mood score for one questionnaire; question 3 counts as `11 - value`.
pub fn weighted_mood_score(scores: &[i64; QUESTION_COUNT]) -> f64 {
    let total_weight: i64 = QUESTION_WEIGHTS.iter().sum();
    let sum: f64 = scores
        .iter()
        .zip(QUESTION_WEIGHTS)
        .enumerate()
        .map(|(i, (&value, weight))| {
            let value = value as f64;
            let value = if i == REVERSED_QUESTION { 11.0 - value } else { value };
            value * weight as f64
        })
        .sum();
    sum / total_weight as f64
}
