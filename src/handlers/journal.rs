use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::db::{entries, insights};
use crate::error::{AppError, AppResult};
use crate::models::entry::{
    weighted_mood_score, CreateEntryRequest, JournalEntry, NewEntry, SubmitRequest, QUESTION_COUNT,
};
use crate::models::insight::InsightRecord;
use crate::AppState;

pub async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Json(body) = payload?;
    let entry = NewEntry::try_from(body)?;

    let entry_id = entries::insert_entry(&state.db, &entry).await?;
    tracing::info!(entry_id, entry_date = %entry.entry_date, "Journal entry created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "entry_id": entry_id })),
    ))
}

pub async fn list_entries(State(state): State<AppState>) -> AppResult<Json<Vec<JournalEntry>>> {
    let all = entries::list_all(&state.db).await?;
    Ok(Json(all))
}

pub async fn list_entry_insights(
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
) -> AppResult<Json<Vec<InsightRecord>>> {
    entries::find_entry(&state.db, entry_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Journal entry {entry_id} not found")))?;

    let records = insights::list_for_entry(&state.db, entry_id).await?;
    Ok(Json(records))
}

/// Questionnaire submission from the mobile client: scores the answers,
/// stores the entry, then refreshes recommendations. A failed refresh is
/// logged but does not fail the submission.
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(body) = payload?;

    let scores: [i64; QUESTION_COUNT] = body.question_values.try_into().map_err(|values: Vec<i64>| {
        AppError::Validation(format!(
            "questionValues must contain {} answers, got {}",
            QUESTION_COUNT,
            values.len()
        ))
    })?;

    let mood = weighted_mood_score(&scores);
    let entry = NewEntry {
        entry_date: chrono::Utc::now().to_rfc3339(),
        scores,
        mood_score: mood.round() as i64,
        response: body.response.unwrap_or_default(),
    };
    let entry_id = entries::insert_entry(&state.db, &entry).await?;
    tracing::info!(entry_id, mood_score = mood, "Questionnaire submitted");

    let recommended = match state.recommender.recommend().await {
        Ok(rec) => Some(rec.insight_id),
        Err(e) => {
            tracing::warn!(entry_id, error = %e, "Recommendation after submit failed");
            None
        }
    };

    Ok(Json(json!({
        "success": true,
        "message": "submitted successfully",
        "entry_id": entry_id,
        "moodScore": entry.mood_score,
        "insight_id": recommended,
    })))
}
