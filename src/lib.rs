use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

/// CSP middleware adds Content-Security-Policy header to all responses
async fn csp_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self'; \
             style-src 'self'; \
             img-src 'self' data:; \
             connect-src 'self'",
        ),
    );
    response
}

pub fn create_router(app_state: std::sync::Arc<services::AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any); // TODO: restrict to the frontend origin in production

    Router::new()
        // Public endpoints (no auth required)
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler)
                .layer(middleware::from_fn(handlers::metrics_auth_middleware)),
        )
        // Assessment API; a verified user_id is assumed present on
        // every call (credential service sits in front of this API)
        .nest("/api/v1", api_routes().layer(cors))
        // Question bank administration
        .nest(
            "/admin",
            admin_routes().route_layer(middleware::from_fn(handlers::admin_auth_middleware)),
        )
        .with_state(app_state)
        .layer(middleware::from_fn(csp_middleware))
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        .route("/languages", get(handlers::languages::list_languages))
        .route(
            "/languages/{language}/questions",
            get(handlers::languages::list_questions),
        )
        .route(
            "/assessments",
            post(handlers::assessments::submit_assessment),
        )
        .route(
            "/users/{user_id}/assessments/latest",
            get(handlers::users::latest_result),
        )
        .route(
            "/users/{user_id}/assessments",
            get(handlers::users::attempt_history),
        )
        .route(
            "/users/{user_id}/status",
            get(handlers::users::assessment_status),
        )
}

fn admin_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new().route("/questions", put(handlers::admin::reload_questions))
}
