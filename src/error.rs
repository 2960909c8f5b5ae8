use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::db::StoreError;
use crate::services::recommend::RecommendError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("AI generation failed: {0}")]
    AiGeneration(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Integrity(msg) => {
                tracing::error!(error = %msg, "Referential integrity error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::AiGeneration(msg) => {
                tracing::error!(error = %msg, "AI generation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = json!({
            "success": false,
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Integrity(msg) => AppError::Integrity(msg),
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<RecommendError> for AppError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::NoEntries => AppError::NotFound("No journal entries found".into()),
            RecommendError::Model(e) => AppError::AiGeneration(format!("{e:#}")),
            RecommendError::Store(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_client_error() {
        let (status, body) = render(AppError::Validation("Missing required field: q3".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Missing required field: q3");
    }

    #[tokio::test]
    async fn test_no_entries_is_not_found() {
        let (status, body) = render(RecommendError::NoEntries.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No journal entries found");
    }

    #[tokio::test]
    async fn test_model_failure_wraps_upstream_text() {
        let err: AppError = RecommendError::Model(anyhow::anyhow!("quota exceeded")).into();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "AI generation failed: quota exceeded");
    }

    #[tokio::test]
    async fn test_integrity_error_surfaces_message() {
        let err: AppError = StoreError::Integrity("FOREIGN KEY constraint failed".into()).into();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("FOREIGN KEY constraint failed"));
    }
}
