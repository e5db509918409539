use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::{
    error::AssessmentError,
    extractors::AppJson,
    models::Question,
    services::{question_bank::QuestionBank, AppState},
};

#[derive(Debug, Deserialize)]
pub struct ReloadQuestionsRequest {
    pub questions: Vec<Question>,
}

/// Bulk load from the question administration process: replaces the
/// entire question set for all languages (full delete-then-insert).
pub async fn reload_questions(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<ReloadQuestionsRequest>,
) -> Result<impl IntoResponse, AssessmentError> {
    tracing::info!(
        "Question bank reload requested: {} questions",
        payload.questions.len()
    );

    let bank = QuestionBank::new(state.mongo.clone(), state.redis.clone());
    let loaded = bank.replace_all(payload.questions).await?;

    Ok(Json(json!({ "loaded": loaded })))
}
