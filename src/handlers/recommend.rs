use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::models::entry::{average, AnalyzeRequest};
use crate::AppState;

/// Request body is ignored; the newest entries drive the call.
pub async fn recommend(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let rec = state.recommender.recommend().await?;

    Ok(Json(json!({
        "success": true,
        "entry_id": rec.entry_id,
        "insight_id": rec.insight_id,
        "recommendation": rec.full_text,
        "insights": rec.insights,
        "recommendations": rec.recommendations,
    })))
}

/// Local average of the submitted scores; no model call.
pub async fn analyze(payload: Result<Json<AnalyzeRequest>, JsonRejection>) -> AppResult<Json<Value>> {
    let Json(body) = payload?;
    let scores = body.scores()?;

    Ok(Json(json!({
        "ai_response": format!("Your average mood score is {:.2}.", average(&scores)),
    })))
}
