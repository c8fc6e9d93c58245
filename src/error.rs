// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use std::fmt;

use crate::models::session::SessionId;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found, echoing the identifier that failed to resolve
    // (e.g. {"error": "Quiz not found", "quizID": "9"}).
    NotFound {
        message: String,
        field: &'static str,
        id: Value,
    },
}

impl AppError {
    pub fn topic_not_found(topic_id: &str) -> Self {
        AppError::NotFound {
            message: "Topic not found".to_string(),
            field: "topicID",
            id: Value::from(topic_id),
        }
    }

    pub fn quiz_not_found(quiz_id: &str) -> Self {
        AppError::NotFound {
            message: "Quiz not found".to_string(),
            field: "quizID",
            id: Value::from(quiz_id),
        }
    }

    /// `session_id` is `None` when the request carried no parseable id.
    pub fn session_not_found(session_id: Option<SessionId>) -> Self {
        AppError::NotFound {
            message: "Session not found".to_string(),
            field: "sessionID",
            id: session_id.map(Value::from).unwrap_or(Value::Null),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        let status = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                body.insert("error".into(), json!("Internal Server Error"));
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::BadRequest(msg) => {
                body.insert("error".into(), json!(msg));
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound { message, field, id } => {
                body.insert("error".into(), json!(message));
                body.insert(field.into(), id);
                StatusCode::NOT_FOUND
            }
        };

        (status, Json(Value::Object(body))).into_response()
    }
}
