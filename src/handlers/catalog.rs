// src/handlers/catalog.rs

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

use crate::{
    config::{HELLO_ACTION, HELLO_WHO},
    error::AppError,
    models::catalog::{Catalog, HelloRequest},
};

/// Query parameters for topic lookup.
#[derive(Debug, Deserialize)]
pub struct TopicParams {
    #[serde(rename = "topicID")]
    pub topic_id: Option<String>,
}

/// Returns the full catalog to a client that identifies itself correctly.
///
/// Any other body (including a missing or malformed one) is rejected with 400.
pub async fn hello(
    State(catalog): State<Arc<Catalog>>,
    payload: Result<Json<HelloRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let accepted = match &payload {
        Ok(Json(req)) => {
            req.who.as_deref() == Some(HELLO_WHO) && req.action.as_deref() == Some(HELLO_ACTION)
        }
        Err(_) => false,
    };

    if !accepted {
        tracing::warn!("Rejected catalog handshake: {:?}", payload.map(|Json(req)| req));
        return Err(AppError::BadRequest("Invalid request format".to_string()));
    }

    Ok(Json(catalog.as_ref().clone()))
}

/// Retrieves a single topic merged with its quiz list.
pub async fn get_topic(
    State(catalog): State<Arc<Catalog>>,
    params: Result<Query<TopicParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let topic_id = params
        .ok()
        .and_then(|Query(params)| params.topic_id)
        .filter(|id| !id.is_empty())
        .ok_or(AppError::BadRequest("Topic ID required".to_string()))?;

    let detail = catalog
        .topic_detail(&topic_id)
        .ok_or_else(|| AppError::topic_not_found(&topic_id))?;

    Ok(Json(detail))
}
