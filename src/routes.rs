// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{catalog, quiz, system},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Nests the quiz API under `/api`; anything else under `/api` is a bad route.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (catalog, session store).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    // Every method router falls back to "bad route" so unsupported methods on
    // known paths answer 400 like unknown paths do.
    let api_routes = Router::new()
        .route(
            "/hello",
            get(system::status)
                .post(catalog::hello)
                .fallback(system::bad_route),
        )
        .route(
            "/topics",
            get(catalog::get_topic).fallback(system::bad_route),
        )
        .route(
            "/quizzes",
            get(quiz::start_quiz).fallback(system::bad_route),
        )
        .route("/go", get(quiz::progress).fallback(system::bad_route))
        .route(
            "/continue",
            get(quiz::progress).fallback(system::bad_route),
        )
        .route(
            "/exit",
            post(quiz::exit_quiz).fallback(system::bad_route),
        )
        .fallback(system::bad_route);

    Router::new()
        .route("/", get(system::index))
        .route("/health", get(system::health))
        .nest("/api", api_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
