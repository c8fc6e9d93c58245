// src/models/catalog.rs

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Banner text shown on the landing screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppInfo {
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

/// Headline numbers displayed under the banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_quizzes: u32,
    pub total_questions: u32,
    pub active_learners: String,
}

/// A subject category grouping quizzes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Topic {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    pub icon: String,
    pub description: String,

    /// CSS color used to theme the topic card (e.g. "#4f46e5").
    pub color: String,
}

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[validate(length(min = 1))]
    pub id: String,

    /// The prompt shown to the user.
    #[validate(length(min = 1, max = 1000))]
    pub text: String,

    #[validate(custom(function = validate_options))]
    pub options: Vec<AnswerOption>,

    /// Must match the id of one entry in `options`.
    pub correct_answer_id: String,
}

impl Question {
    pub fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|o| o.id == option_id)
    }

    pub fn is_correct(&self, answer_id: Option<&str>) -> bool {
        answer_id == Some(self.correct_answer_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    pub intro: String,
    pub estimated_questions: u32,

    /// Free-form label such as "Beginner" or "Intermediate".
    pub difficulty: String,
    pub time_estimate: String,

    #[validate(nested)]
    pub questions: Vec<Question>,
}

/// The complete static catalog, in the shape returned by `POST /api/hello`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub app: AppInfo,
    pub stats: Stats,
    pub topics: Vec<Topic>,

    /// Quiz lists keyed by topic id.
    pub quizzes: BTreeMap<String, Vec<Quiz>>,
}

impl Catalog {
    pub fn topic(&self, topic_id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == topic_id)
    }

    /// Quizzes registered under a topic id, `None` when the topic has no entry.
    pub fn quizzes_for(&self, topic_id: &str) -> Option<&[Quiz]> {
        self.quizzes.get(topic_id).map(Vec::as_slice)
    }

    pub fn quiz(&self, topic_id: &str, quiz_id: &str) -> Option<&Quiz> {
        self.quizzes_for(topic_id)?.iter().find(|q| q.id == quiz_id)
    }

    pub fn topic_detail(&self, topic_id: &str) -> Option<TopicDetail> {
        let topic = self.topic(topic_id)?;
        Some(TopicDetail {
            topic: topic.clone(),
            quizzes: self.quizzes_for(topic_id).unwrap_or_default().to_vec(),
        })
    }
}

/// A topic merged with its quiz list (`GET /api/topics`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDetail {
    #[serde(flatten)]
    pub topic: Topic,
    pub quizzes: Vec<Quiz>,
}

/// DTO for the catalog handshake.
#[derive(Debug, Serialize, Deserialize)]
pub struct HelloRequest {
    pub who: Option<String>,
    pub action: Option<String>,
}

fn validate_options(options: &[AnswerOption]) -> Result<(), validator::ValidationError> {
    if options.is_empty() {
        return Err(validator::ValidationError::new("options_cannot_be_empty"));
    }
    let mut seen = HashSet::new();
    for opt in options {
        if opt.id.is_empty() || opt.text.is_empty() {
            return Err(validator::ValidationError::new("option_cannot_be_blank"));
        }
        if !seen.insert(opt.id.as_str()) {
            return Err(validator::ValidationError::new("duplicate_option_id"));
        }
    }
    Ok(())
}
