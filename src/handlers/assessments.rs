use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::AssessmentError,
    extractors::AppJson,
    models::{SubmitAssessmentRequest, SubmitAssessmentResponse},
    services::{assessment_service::AssessmentService, AppState},
};

pub async fn submit_assessment(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<SubmitAssessmentRequest>,
) -> Result<impl IntoResponse, AssessmentError> {
    payload
        .validate()
        .map_err(|e| AssessmentError::invalid_input(e.to_string()))?;

    let service = AssessmentService::new(state.mongo.clone(), state.redis.clone());
    let attempt = service.submit(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitAssessmentResponse::from(&attempt)),
    ))
}
