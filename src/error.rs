use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy shared by all services.
///
/// `InvalidInput` and `NotFound` are client errors with human-readable
/// messages; `Persistence` is a server error and the whole submission
/// is safe to retry (idempotency is not guaranteed: a retry after a
/// failed projection write but successful attempt write creates a
/// duplicate attempt).
#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl AssessmentError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AssessmentError::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AssessmentError::NotFound(message.into())
    }
}

impl From<mongodb::error::Error> for AssessmentError {
    fn from(err: mongodb::error::Error) -> Self {
        AssessmentError::Persistence(anyhow::Error::new(err))
    }
}

impl From<redis::RedisError> for AssessmentError {
    fn from(err: redis::RedisError) -> Self {
        AssessmentError::Persistence(anyhow::Error::new(err))
    }
}

impl IntoResponse for AssessmentError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AssessmentError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AssessmentError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AssessmentError::Persistence(err) => {
                tracing::error!("Persistence failure: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_400() {
        let response = AssessmentError::invalid_input("bad").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = AssessmentError::not_found("missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn persistence_maps_to_500() {
        let response =
            AssessmentError::Persistence(anyhow::anyhow!("storage unreachable")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
