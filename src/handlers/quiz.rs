// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::AppError,
    models::{
        catalog::Catalog,
        session::{ExitRequest, Progress, SessionId, StartQuizResponse, parse_session_id},
    },
    store::SessionStore,
};

/// Query parameters for starting a quiz.
#[derive(Debug, Deserialize)]
pub struct StartParams {
    #[serde(rename = "quizID")]
    pub quiz_id: Option<String>,
    #[serde(rename = "topicID")]
    pub topic_id: Option<String>,
}

/// Query parameters shared by `/api/go` and `/api/continue`.
#[derive(Debug, Deserialize)]
pub struct ProgressParams {
    #[serde(rename = "sessionID")]
    pub session_id: Option<String>,

    /// Answer for the question served by the previous call.
    #[serde(rename = "answerID")]
    pub answer_id: Option<String>,
}

/// Starts a quiz session.
///
/// * Resolves the topic first, then the quiz within it.
/// * Stores a snapshot of the quiz under a fresh session id.
/// * Returns the id together with the full quiz.
pub async fn start_quiz(
    State(catalog): State<Arc<Catalog>>,
    State(sessions): State<Arc<dyn SessionStore>>,
    params: Result<Query<StartParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let required = || AppError::BadRequest("Quiz ID and Topic ID required".to_string());
    let Query(params) = params.map_err(|rejection| {
        tracing::warn!("Rejected quiz start query: {}", rejection);
        required()
    })?;

    let (Some(quiz_id), Some(topic_id)) = (
        params.quiz_id.filter(|id| !id.is_empty()),
        params.topic_id.filter(|id| !id.is_empty()),
    ) else {
        return Err(required());
    };

    let quizzes = catalog
        .quizzes_for(&topic_id)
        .ok_or_else(|| AppError::topic_not_found(&topic_id))?;

    let quiz = quizzes
        .iter()
        .find(|q| q.id == quiz_id)
        .ok_or_else(|| AppError::quiz_not_found(&quiz_id))?
        .clone();

    let session_id = sessions.create(&topic_id, quiz.clone()).await?;
    tracing::info!(
        "Session {} started: topic={} quiz={}",
        session_id,
        topic_id,
        quiz_id
    );

    Ok(Json(StartQuizResponse { session_id, quiz }))
}

/// Advances a session by one question (`/api/go` and `/api/continue`).
///
/// The optional answer is recorded for the question served by the previous
/// call. When no questions remain the session is scored and discarded.
pub async fn progress(
    State(sessions): State<Arc<dyn SessionStore>>,
    params: Result<Query<ProgressParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    // An unreadable query (e.g. a repeated sessionID) names no session.
    let Ok(Query(params)) = params else {
        return Err(AppError::session_not_found(None));
    };

    let session_id: Option<SessionId> = params
        .session_id
        .as_deref()
        .and_then(|raw| raw.trim().parse().ok());

    let Some(id) = session_id else {
        return Err(AppError::session_not_found(None));
    };

    let step = sessions
        .progress(id, params.answer_id.as_deref())
        .await?
        .ok_or_else(|| AppError::session_not_found(Some(id)))?;

    if let Progress::Complete { results, .. } = &step {
        tracing::info!("Session {} completed: {}", id, results.message);
    }

    Ok(Json(step))
}

/// Discards a session. Unknown or missing ids are not an error.
pub async fn exit_quiz(
    State(sessions): State<Arc<dyn SessionStore>>,
    payload: Result<Json<ExitRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let session_id = payload
        .ok()
        .and_then(|Json(req)| req.session_id)
        .as_ref()
        .and_then(parse_session_id);

    if let Some(id) = session_id {
        if sessions.delete(id).await? {
            tracing::info!("Session {} exited", id);
        }
    }

    Ok(Json(json!({ "exited": true })))
}
