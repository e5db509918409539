use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::{
    error::AssessmentError,
    models::Language,
    services::{question_bank::QuestionBank, AppState},
};

pub async fn list_languages() -> impl IntoResponse {
    Json(json!({ "languages": QuestionBank::list_languages() }))
}

pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Path(language): Path<String>,
) -> Result<impl IntoResponse, AssessmentError> {
    let language: Language = language
        .parse()
        .map_err(|e| AssessmentError::invalid_input(format!("{}", e)))?;

    tracing::info!("Listing questions for language: {}", language);

    let bank = QuestionBank::new(state.mongo.clone(), state.redis.clone());
    let questions = bank.questions_for_display(language).await?;

    Ok(Json(json!({
        "count": questions.len(),
        "questions": questions
    })))
}
