use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{
    error::AssessmentError,
    models::{AttemptHistoryResponse, StatusResponse},
    services::{
        assessment_service::AssessmentService, attempt_ledger::AttemptLedger,
        profile_projection::ProfileProjection, AppState,
    },
};

/// Most recent attempt across all languages, with question metadata
/// joined in for display.
pub async fn latest_result(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AssessmentError> {
    let service = AssessmentService::new(state.mongo.clone(), state.redis.clone());
    let result = service.latest_result(&user_id).await?;
    Ok(Json(result))
}

/// Full attempt history, most recent first.
pub async fn attempt_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AssessmentError> {
    let ledger = AttemptLedger::new(state.mongo.clone());
    let attempts = ledger.all_attempts(&user_id).await?;
    let count = attempts.len();
    Ok(Json(AttemptHistoryResponse { attempts, count }))
}

/// Cheap status check backed by the profile projection.
pub async fn assessment_status(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AssessmentError> {
    let projection = ProfileProjection::new(state.mongo.clone());
    let profile = projection.status(&user_id).await?;
    Ok(Json(StatusResponse::from(profile)))
}
