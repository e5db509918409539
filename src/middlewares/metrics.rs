use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};
use crate::models::Language;

/// Records request count and latency for every HTTP request.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &path])
        .observe(duration);

    response
}

/// Normalize URL path to avoid cardinality explosion. User ids are
/// caller-supplied opaque strings, so any segment following "users" is
/// collapsed, along with UUID-like and numeric segments. Known
/// language codes stay as-is; anything else after "languages" is
/// caller input (those requests 400 but still get counted) and is
/// collapsed too.
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let mut normalized = Vec::with_capacity(segments.len());
    let mut previous = "";

    for segment in segments {
        let unknown_language = previous == "languages" && segment.parse::<Language>().is_err();
        if previous == "users" || unknown_language || is_uuid_like(segment) || is_numeric_id(segment)
        {
            normalized.push("{id}");
        } else {
            normalized.push(segment);
        }
        previous = segment;
    }

    normalized.join("/")
}

/// Check if string looks like a UUID (8-4-4-4-12 hex characters)
fn is_uuid_like(s: &str) -> bool {
    if s.len() != 36 {
        return false;
    }
    s.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

fn is_numeric_id(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_segments_are_collapsed() {
        assert_eq!(
            normalize_path("/api/v1/users/learner-42/assessments/latest"),
            "/api/v1/users/{id}/assessments/latest"
        );
        assert_eq!(
            normalize_path("/api/v1/users/learner-42/status"),
            "/api/v1/users/{id}/status"
        );
    }

    #[test]
    fn language_segments_are_preserved() {
        assert_eq!(
            normalize_path("/api/v1/languages/python/questions"),
            "/api/v1/languages/python/questions"
        );
    }

    #[test]
    fn unknown_language_segments_are_collapsed() {
        assert_eq!(
            normalize_path("/api/v1/languages/cobol/questions"),
            "/api/v1/languages/{id}/questions"
        );
        assert_eq!(
            normalize_path("/api/v1/languages/Python/questions"),
            "/api/v1/languages/{id}/questions"
        );
    }

    #[test]
    fn uuid_and_numeric_segments_are_collapsed() {
        assert_eq!(
            normalize_path("/api/v1/attempts/550e8400-e29b-41d4-a716-446655440000"),
            "/api/v1/attempts/{id}"
        );
        assert_eq!(normalize_path("/api/v1/attempts/123"), "/api/v1/attempts/{id}");
        assert_eq!(normalize_path("/health"), "/health");
    }

    #[test]
    fn uuid_detection() {
        assert!(is_uuid_like("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!is_uuid_like("not-a-uuid"));
        assert!(!is_numeric_id("abc"));
        assert!(is_numeric_id("999999"));
    }
}
