//! HTTP client for the quiz service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::error::ClientError;
use crate::{
    config::{HELLO_ACTION, HELLO_WHO},
    models::{
        catalog::Catalog,
        session::{Progress, SessionId, StartQuizResponse},
    },
};

/// The server operations the client state machine relies on.
///
/// Implemented over HTTP by [`ApiClient`]; tests substitute in-process fakes.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    /// Fetches the full catalog.
    async fn hello(&self) -> Result<Catalog, ClientError>;

    async fn start_quiz(
        &self,
        quiz_id: &str,
        topic_id: &str,
    ) -> Result<StartQuizResponse, ClientError>;

    /// Advances the session. `answer_id` belongs to the question served by
    /// the previous call and must be `None` on the first call.
    async fn progress(
        &self,
        session_id: SessionId,
        answer_id: Option<&str>,
    ) -> Result<Progress, ClientError>;

    async fn exit(&self, session_id: SessionId) -> Result<(), ClientError>;
}

/// Quiz service client
pub struct ApiClient {
    /// HTTP client
    client: Client,
    /// API root, e.g. `http://localhost:3002/api`
    base_url: String,
}

impl ApiClient {
    /// Per-request timeout so an unreachable server degrades instead of hanging
    const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(Self::TIMEOUT).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decodes a success body or turns the `{error}` body into `ApiError`.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["error"].as_str().map(String::from))
                .unwrap_or(body);
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl QuizBackend for ApiClient {
    async fn hello(&self) -> Result<Catalog, ClientError> {
        let response = self
            .client
            .post(self.url("/hello"))
            .json(&json!({ "who": HELLO_WHO, "action": HELLO_ACTION }))
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn start_quiz(
        &self,
        quiz_id: &str,
        topic_id: &str,
    ) -> Result<StartQuizResponse, ClientError> {
        let response = self
            .client
            .get(self.url("/quizzes"))
            .query(&[("quizID", quiz_id), ("topicID", topic_id)])
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn progress(
        &self,
        session_id: SessionId,
        answer_id: Option<&str>,
    ) -> Result<Progress, ClientError> {
        // "/go" opens the run, "/continue" carries answers; both behave the same.
        let (path, mut query) = match answer_id {
            None => ("/go", vec![]),
            Some(answer) => ("/continue", vec![("answerID", answer.to_string())]),
        };
        query.push(("sessionID", session_id.to_string()));

        let response = self
            .client
            .get(self.url(path))
            .query(&query)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn exit(&self, session_id: SessionId) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("/exit"))
            .json(&json!({ "sessionID": session_id }))
            .send()
            .await?;

        let _: serde_json::Value = Self::decode(response).await?;
        Ok(())
    }
}
