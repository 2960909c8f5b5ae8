use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "lunalog-api",
        "version": env!("CARGO_PKG_VERSION"),
        "llm_provider": format!("{:?}", state.config.llm_provider).to_lowercase(),
    }))
}

/// Ready once the database answers and both journal tables exist.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let tables = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('JournalEntries', 'AIInsights')",
    )
    .fetch_one(&state.db)
    .await;

    let (database, schema) = match tables {
        Ok(2) => ("ok", "ok"),
        Ok(_) => ("ok", "missing_tables"),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            ("failed", "unknown")
        }
    };

    let status = if schema == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ready" } else { "not_ready" },
            "checks": { "database": database, "schema": schema },
        })),
    )
}
