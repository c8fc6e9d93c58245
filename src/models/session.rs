// src/models/session.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    models::catalog::{Question, Quiz},
    utils::score::{QuizResults, calculate_score},
};

pub type SessionId = u64;

/// Server-side record of an in-progress quiz.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub topic_id: String,

    /// Snapshot of the quiz taken when the session started.
    pub quiz: Quiz,

    /// Index of the next question to serve. Never decreases and never
    /// exceeds `quiz.questions.len()`.
    pub current_question_index: usize,

    /// Recorded answer ids, indexed by question position. Sparse.
    pub answers: Vec<Option<String>>,

    pub started_at: DateTime<Utc>,
    pub completed: bool,
}

impl Session {
    pub fn new(id: SessionId, topic_id: impl Into<String>, quiz: Quiz) -> Self {
        Self {
            id,
            topic_id: topic_id.into(),
            quiz,
            current_question_index: 0,
            answers: Vec::new(),
            started_at: Utc::now(),
            completed: false,
        }
    }

    /// Records `answer_id` for the question at `question_index`.
    ///
    /// Callers pass the index of the question being *left*, never the one
    /// about to be served. Out-of-range indexes are ignored.
    pub fn record_answer(&mut self, question_index: usize, answer_id: impl Into<String>) {
        if question_index >= self.quiz.questions.len() {
            return;
        }
        if self.answers.len() <= question_index {
            self.answers.resize(question_index + 1, None);
        }
        self.answers[question_index] = Some(answer_id.into());
    }

    /// Applies one progression step.
    ///
    /// The answer (if any) belongs to the question served by the previous
    /// call, i.e. `current_question_index - 1`. Once the cursor has moved past
    /// the last question the session is scored and marked completed; the
    /// caller is responsible for discarding it.
    pub fn advance(&mut self, answer_id: Option<&str>) -> Progress {
        if let Some(answer_id) = answer_id.filter(|a| !a.is_empty()) {
            if let Some(left) = self.current_question_index.checked_sub(1) {
                self.record_answer(left, answer_id);
            }
        }

        let total = self.quiz.questions.len();
        if self.current_question_index >= total {
            self.completed = true;
            return Progress::complete(self.results());
        }

        let question = self.quiz.questions[self.current_question_index].clone();
        self.current_question_index += 1;

        Progress::next(question, self.current_question_index, total)
    }

    pub fn results(&self) -> QuizResults {
        calculate_score(&self.quiz.questions, &self.answers)
    }
}

/// Response of `GET /api/go` and `GET /api/continue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Progress {
    Complete {
        results: QuizResults,
        complete: bool,
    },
    #[serde(rename_all = "camelCase")]
    Next {
        question: Question,

        /// 1-based position of `question`.
        current_question: usize,
        total_questions: usize,
        complete: bool,
    },
}

impl Progress {
    pub fn next(question: Question, current_question: usize, total_questions: usize) -> Self {
        Progress::Next {
            question,
            current_question,
            total_questions,
            complete: false,
        }
    }

    pub fn complete(results: QuizResults) -> Self {
        Progress::Complete {
            results,
            complete: true,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Progress::Complete { .. })
    }
}

/// Response of `GET /api/quizzes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartQuizResponse {
    #[serde(rename = "sessionID")]
    pub session_id: SessionId,
    pub quiz: Quiz,
}

/// DTO for `POST /api/exit`. The id may arrive as a number or a string.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExitRequest {
    #[serde(rename = "sessionID")]
    pub session_id: Option<serde_json::Value>,
}

/// Lenient session id parsing for query strings and JSON bodies.
pub fn parse_session_id(raw: &serde_json::Value) -> Option<SessionId> {
    match raw {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
