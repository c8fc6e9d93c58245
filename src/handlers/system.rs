// src/handlers/system.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

use crate::{error::AppError, store::SessionStore};

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Service banner listing the available endpoints.
pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Qzicl Server API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "api": "/api/*",
            "hello": "POST /api/hello",
            "topics": "GET /api/topics",
            "quizzes": "GET /api/quizzes",
            "go": "GET /api/go",
            "continue": "GET /api/continue",
            "exit": "POST /api/exit"
        }
    }))
}

/// Connectivity probe used by the client before the catalog handshake.
pub async fn status() -> impl IntoResponse {
    Json(json!({
        "message": "Backend server connected successfully!",
        "status": "healthy",
        "timestamp": timestamp(),
        "endpoints": {
            "health": "/health",
            "topics": "/api/topics",
            "quizzes": "/api/quizzes"
        }
    }))
}

pub async fn health(
    State(sessions): State<Arc<dyn SessionStore>>,
) -> Result<impl IntoResponse, AppError> {
    let active = sessions.count().await?;

    Ok(Json(json!({
        "status": "OK",
        "timestamp": timestamp(),
        "activeSessions": active
    })))
}

/// Fallback for any unmatched `/api/*` path or method.
pub async fn bad_route(method: axum::http::Method, uri: axum::http::Uri) -> AppError {
    tracing::warn!("Invalid API route: {} {}", method, uri.path());
    AppError::BadRequest("bad route".to_string())
}
