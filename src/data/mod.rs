// src/data/mod.rs

//! The static quiz catalog.
//!
//! A single copy is embedded in the binary and shared by the HTTP service and
//! the client's offline mode. Deployments may point `CATALOG_PATH` at a JSON
//! file of the same shape instead.

use std::path::Path;

use thiserror::Error;
use validator::Validate;

use crate::models::catalog::Catalog;

const EMBEDDED_CATALOG: &str = include_str!("catalog.json");

/// Appended to the banner subtitle when the client falls back to local data.
const OFFLINE_MARKER: &str = " (Offline Mode)";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid catalog entry: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("quiz {quiz_id} question {question_id}: correct answer {answer_id} is not one of its options")]
    UnknownAnswer {
        quiz_id: String,
        question_id: String,
        answer_id: String,
    },

    #[error("quizzes registered under unknown topic {0}")]
    UnknownTopic(String),
}

/// Parses and validates the catalog bundled with the binary.
pub fn embedded() -> Result<Catalog, CatalogError> {
    parse(EMBEDDED_CATALOG)
}

/// The embedded catalog, labelled for use without a server.
pub fn offline() -> Result<Catalog, CatalogError> {
    let mut catalog = embedded()?;
    catalog.app.subtitle.push_str(OFFLINE_MARKER);
    Ok(catalog)
}

pub fn from_path(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let raw = std::fs::read_to_string(path)?;
    parse(&raw)
}

/// Loads from `path` when given, otherwise the embedded catalog.
pub fn load(path: Option<&str>) -> Result<Catalog, CatalogError> {
    match path {
        Some(path) => from_path(path),
        None => embedded(),
    }
}

pub fn parse(raw: &str) -> Result<Catalog, CatalogError> {
    let catalog: Catalog = serde_json::from_str(raw)?;
    check_integrity(&catalog)?;
    Ok(catalog)
}

/// Rejects catalogs whose answer keys or topic references do not resolve.
pub fn check_integrity(catalog: &Catalog) -> Result<(), CatalogError> {
    for topic in &catalog.topics {
        topic.validate()?;
    }

    for (topic_id, quizzes) in &catalog.quizzes {
        if catalog.topic(topic_id).is_none() {
            return Err(CatalogError::UnknownTopic(topic_id.clone()));
        }

        for quiz in quizzes {
            quiz.validate()?;

            if let Some(question) = quiz
                .questions
                .iter()
                .find(|q| !q.has_option(&q.correct_answer_id))
            {
                return Err(CatalogError::UnknownAnswer {
                    quiz_id: quiz.id.clone(),
                    question_id: question.id.clone(),
                    answer_id: question.correct_answer_id.clone(),
                });
            }
        }
    }

    Ok(())
}
