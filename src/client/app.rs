//! Client-side screen flow
//!
//! Mirrors the browser front-end: topics → quizzes → get ready → quiz →
//! results → review. Every server call has a local fallback, so a quiz can be
//! finished with the server gone.

use super::{api::QuizBackend, error::ClientError};
use crate::{
    data,
    models::{
        catalog::{Catalog, Question, Quiz, Topic},
        session::{Progress, SessionId},
    },
    utils::score::{QuizResults, calculate_score},
};

const START_FAILED: &str = "Failed to start quiz session. Running in offline mode.";
const CONNECTION_LOST: &str =
    "Server connection lost. Cannot submit results remotely. Calculating score locally.";
const CONTINUING_OFFLINE: &str = "Server connection lost. Continuing in offline mode.";

/// The screen currently shown, with the selection it was reached with.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Before the catalog has been fetched (or substituted).
    Loading,
    Topics,
    Quizzes {
        topic: Topic,
    },
    GetReady {
        topic: Topic,
        quiz: Quiz,
    },
    Quiz {
        topic: Topic,
        quiz: Quiz,
        /// Question on screen, 0-based.
        index: usize,
    },
    Results {
        topic: Topic,
        quiz: Quiz,
        results: QuizResults,
    },
    Review {
        topic: Topic,
        quiz: Quiz,
        results: QuizResults,
    },
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Loading => "loading",
            View::Topics => "topics",
            View::Quizzes { .. } => "quizzes",
            View::GetReady { .. } => "get-ready",
            View::Quiz { .. } => "quiz",
            View::Results { .. } => "results",
            View::Review { .. } => "review",
        }
    }

    pub fn topic(&self) -> Option<&Topic> {
        match self {
            View::Loading | View::Topics => None,
            View::Quizzes { topic }
            | View::GetReady { topic, .. }
            | View::Quiz { topic, .. }
            | View::Results { topic, .. }
            | View::Review { topic, .. } => Some(topic),
        }
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        match self {
            View::Loading | View::Topics | View::Quizzes { .. } => None,
            View::GetReady { quiz, .. }
            | View::Quiz { quiz, .. }
            | View::Results { quiz, .. }
            | View::Review { quiz, .. } => Some(quiz),
        }
    }

    pub fn results(&self) -> Option<&QuizResults> {
        match self {
            View::Results { results, .. } | View::Review { results, .. } => Some(results),
            _ => None,
        }
    }
}

/// One line of the post-quiz review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRow<'a> {
    pub number: usize,
    pub question: &'a Question,
    pub chosen: Option<&'a str>,
    pub is_correct: bool,
}

/// Client state: the current view plus the context that spans views.
pub struct QuizApp<B: QuizBackend> {
    backend: B,
    catalog: Option<Catalog>,
    view: View,

    /// Server session for the running quiz; `None` in offline mode.
    session_id: Option<SessionId>,

    /// Chosen option ids, indexed by question position.
    answers: Vec<Option<String>>,

    /// Warning shown above the current screen.
    banner: Option<String>,
}

impl<B: QuizBackend> QuizApp<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            catalog: None,
            view: View::Loading,
            session_id: None,
            answers: Vec::new(),
            banner: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn answers(&self) -> &[Option<String>] {
        &self.answers
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// True while a quiz is running without a server session.
    pub fn is_offline(&self) -> bool {
        matches!(self.view, View::GetReady { .. } | View::Quiz { .. }) && self.session_id.is_none()
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.view {
            View::Quiz { quiz, index, .. } => quiz.questions.get(*index),
            _ => None,
        }
    }

    pub fn selected_answer(&self) -> Option<&str> {
        match &self.view {
            View::Quiz { index, .. } => self.answers.get(*index).and_then(|a| a.as_deref()),
            _ => None,
        }
    }

    /// Share of the quiz reached, counting the question on screen.
    pub fn progress_percentage(&self) -> Option<f64> {
        match &self.view {
            View::Quiz { quiz, index, .. } if !quiz.questions.is_empty() => {
                Some((*index + 1) as f64 / quiz.questions.len() as f64 * 100.0)
            }
            _ => None,
        }
    }

    pub fn review_rows(&self) -> Vec<ReviewRow<'_>> {
        let quiz = match &self.view {
            View::Results { quiz, .. } | View::Review { quiz, .. } => quiz,
            _ => return Vec::new(),
        };

        quiz.questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let chosen = self.answers.get(index).and_then(|a| a.as_deref());
                ReviewRow {
                    number: index + 1,
                    question,
                    chosen,
                    is_correct: question.is_correct(chosen),
                }
            })
            .collect()
    }

    /// Loads the catalog from the server, falling back to the embedded copy.
    ///
    /// Also serves as "retry connection" from the topics screen; a failed
    /// retry keeps whatever catalog is already loaded.
    pub async fn initialize(&mut self) -> Result<(), ClientError> {
        if !matches!(self.view, View::Loading | View::Topics) {
            return Err(self.invalid("load the catalog"));
        }

        match self.backend.hello().await {
            Ok(catalog) => {
                tracing::info!("Catalog loaded: {} topics", catalog.topics.len());
                self.catalog = Some(catalog);
                self.banner = None;
            }
            Err(e) => {
                tracing::warn!("Catalog fetch failed, using local data: {}", e);
                self.banner = Some(format!("Cannot connect to server: {}", e));
                if self.catalog.is_none() {
                    self.catalog = data::offline()
                        .inspect_err(|err| tracing::error!("Embedded catalog unusable: {}", err))
                        .ok();
                }
            }
        }

        self.view = View::Topics;
        Ok(())
    }

    pub fn select_topic(&mut self, topic_id: &str) -> Result<(), ClientError> {
        if !matches!(self.view, View::Topics) {
            return Err(self.invalid("select a topic"));
        }

        let topic = self
            .catalog
            .as_ref()
            .and_then(|c| c.topic(topic_id))
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                kind: "topic",
                id: topic_id.to_string(),
            })?;

        self.view = View::Quizzes { topic };
        Ok(())
    }

    pub fn back_to_topics(&mut self) -> Result<(), ClientError> {
        if !matches!(self.view, View::Quizzes { .. }) {
            return Err(self.invalid("go back to topics"));
        }
        self.view = View::Topics;
        Ok(())
    }

    /// Opens a session for `quiz_id` and shows its intro.
    ///
    /// Answers from any earlier run are dropped first. If the server cannot
    /// start a session the local copy of the quiz is used instead.
    pub async fn select_quiz(&mut self, quiz_id: &str) -> Result<(), ClientError> {
        let topic = match &self.view {
            View::Quizzes { topic } => topic.clone(),
            _ => return Err(self.invalid("select a quiz")),
        };

        self.reset_run();

        match self.backend.start_quiz(quiz_id, &topic.id).await {
            Ok(started) => {
                tracing::info!("Quiz session {} started", started.session_id);
                self.session_id = Some(started.session_id);
                self.view = View::GetReady {
                    topic,
                    quiz: started.quiz,
                };
            }
            Err(e) => {
                tracing::warn!("Error starting quiz {}: {}", quiz_id, e);
                let local = self
                    .catalog
                    .as_ref()
                    .and_then(|c| c.quiz(&topic.id, quiz_id))
                    .cloned();

                match local {
                    Some(quiz) => {
                        self.banner = Some(START_FAILED.to_string());
                        self.view = View::GetReady { topic, quiz };
                    }
                    None => {
                        self.banner = Some(format!("{} Quiz data missing.", START_FAILED));
                        self.view = View::Topics;
                    }
                }
            }
        }

        Ok(())
    }

    /// Leaves the intro and shows the first question.
    ///
    /// With a server session this makes the opening progression call, which
    /// carries no answer and moves the server cursor onto question 0.
    pub async fn start(&mut self) -> Result<(), ClientError> {
        let (topic, quiz) = match &self.view {
            View::GetReady { topic, quiz } => (topic.clone(), quiz.clone()),
            _ => return Err(self.invalid("start the quiz")),
        };

        self.answers.clear();

        if let Some(id) = self.session_id {
            match self.backend.progress(id, None).await {
                Ok(Progress::Next { .. }) => {}
                Ok(Progress::Complete { results, .. }) => {
                    self.session_id = None;
                    self.view = View::Results {
                        topic,
                        quiz,
                        results,
                    };
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Server interaction error at quiz start: {}", e);
                    self.abandon_session(&e).await;
                    self.banner = Some(CONTINUING_OFFLINE.to_string());
                }
            }
        }

        if quiz.questions.is_empty() {
            let results = calculate_score(&quiz.questions, &self.answers);
            self.view = View::Results {
                topic,
                quiz,
                results,
            };
            return Ok(());
        }

        self.view = View::Quiz {
            topic,
            quiz,
            index: 0,
        };
        Ok(())
    }

    /// Marks `option_id` as the answer to the question on screen.
    pub fn choose_answer(&mut self, option_id: &str) -> Result<(), ClientError> {
        let index = match &self.view {
            View::Quiz { quiz, index, .. } => {
                let known = quiz
                    .questions
                    .get(*index)
                    .is_some_and(|q| q.has_option(option_id));
                if !known {
                    return Err(ClientError::NotFound {
                        kind: "option",
                        id: option_id.to_string(),
                    });
                }
                *index
            }
            _ => return Err(self.invalid("choose an answer")),
        };

        if self.answers.len() <= index {
            self.answers.resize(index + 1, None);
        }
        self.answers[index] = Some(option_id.to_string());
        Ok(())
    }

    /// Submits the chosen answer and moves on.
    ///
    /// Online, the server records the answer and either serves the next
    /// question or returns the score. Any failure finishes the quiz with a
    /// locally computed score.
    pub async fn submit(&mut self) -> Result<(), ClientError> {
        let (topic, quiz, index) = match &self.view {
            View::Quiz { topic, quiz, index } => (topic.clone(), quiz.clone(), *index),
            _ => return Err(self.invalid("submit an answer")),
        };

        let Some(answer) = self.answers.get(index).cloned().flatten() else {
            return Err(self.invalid("submit without an answer"));
        };

        let is_last = index + 1 >= quiz.questions.len();
        self.banner = None;

        let Some(id) = self.session_id else {
            if is_last {
                let results = calculate_score(&quiz.questions, &self.answers);
                self.view = View::Results {
                    topic,
                    quiz,
                    results,
                };
            } else {
                self.view = View::Quiz {
                    topic,
                    quiz,
                    index: index + 1,
                };
            }
            return Ok(());
        };

        match self.backend.progress(id, Some(&answer)).await {
            Ok(Progress::Complete { results, .. }) => {
                self.session_id = None;
                self.view = View::Results {
                    topic,
                    quiz,
                    results,
                };
            }
            Ok(Progress::Next { .. }) if !is_last => {
                self.view = View::Quiz {
                    topic,
                    quiz,
                    index: index + 1,
                };
            }
            Ok(Progress::Next { .. }) => {
                tracing::error!("Session {} still open after last question", id);
                self.discard_session().await;
                self.finish_locally(topic, quiz);
            }
            Err(e) => {
                tracing::error!("Server interaction error during quiz: {}", e);
                self.abandon_session(&e).await;
                self.finish_locally(topic, quiz);
            }
        }

        Ok(())
    }

    /// Scores the run from the locally held answers after losing the server.
    fn finish_locally(&mut self, topic: Topic, quiz: Quiz) {
        self.banner = Some(CONNECTION_LOST.to_string());
        let results = calculate_score(&quiz.questions, &self.answers);
        self.view = View::Results {
            topic,
            quiz,
            results,
        };
    }

    pub fn review(&mut self) -> Result<(), ClientError> {
        match std::mem::replace(&mut self.view, View::Loading) {
            View::Results {
                topic,
                quiz,
                results,
            } => {
                self.view = View::Review {
                    topic,
                    quiz,
                    results,
                };
                Ok(())
            }
            other => {
                self.view = other;
                Err(self.invalid("review answers"))
            }
        }
    }

    pub fn back_to_results(&mut self) -> Result<(), ClientError> {
        match std::mem::replace(&mut self.view, View::Loading) {
            View::Review {
                topic,
                quiz,
                results,
            } => {
                self.view = View::Results {
                    topic,
                    quiz,
                    results,
                };
                Ok(())
            }
            other => {
                self.view = other;
                Err(self.invalid("go back to results"))
            }
        }
    }

    /// Returns to the quiz list of the current topic, dropping the quiz.
    pub async fn back_to_quizzes(&mut self) -> Result<(), ClientError> {
        let topic = match &self.view {
            View::GetReady { topic, .. } | View::Results { topic, .. } | View::Review { topic, .. } => {
                topic.clone()
            }
            _ => return Err(self.invalid("go back to quizzes")),
        };

        self.discard_session().await;
        self.reset_run();
        self.view = View::Quizzes { topic };
        Ok(())
    }

    /// Runs the finished quiz again under a fresh session.
    pub async fn retry(&mut self) -> Result<(), ClientError> {
        let (topic, quiz_id) = match &self.view {
            View::Results { topic, quiz, .. } | View::Review { topic, quiz, .. } => {
                (topic.clone(), quiz.id.clone())
            }
            _ => return Err(self.invalid("retry the quiz")),
        };

        self.view = View::Quizzes { topic };
        self.select_quiz(&quiz_id).await
    }

    /// Abandons whatever is in progress and returns to the topic list.
    ///
    /// The server is told to drop the session when there is one; failing to
    /// reach it does not stop the exit.
    pub async fn exit(&mut self) {
        self.discard_session().await;
        self.reset_run();
        self.view = if self.catalog.is_some() {
            View::Topics
        } else {
            View::Loading
        };
    }

    async fn discard_session(&mut self) {
        if let Some(id) = self.session_id.take() {
            match self.backend.exit(id).await {
                Ok(()) => tracing::info!("Session {} exited on server", id),
                Err(e) => tracing::warn!("Could not communicate quiz exit to server: {}", e),
            }
        }
    }

    /// Drops the session after a failed call. A server that answered with an
    /// error is still told to discard it; an unreachable one is not retried.
    async fn abandon_session(&mut self, error: &ClientError) {
        if matches!(error, ClientError::RequestError(_)) {
            self.session_id = None;
        } else {
            self.discard_session().await;
        }
    }

    fn reset_run(&mut self) {
        self.session_id = None;
        self.answers.clear();
        self.banner = None;
    }

    fn invalid(&self, action: &'static str) -> ClientError {
        ClientError::InvalidAction {
            action,
            view: self.view.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            Mutex,
            atomic::{AtomicBool, Ordering},
        },
    };

    use async_trait::async_trait;

    use super::*;
    use crate::{
        models::session::StartQuizResponse,
        store::{InMemorySessionStore, SessionStore},
    };

    /// In-process stand-in for the HTTP service that can be switched off.
    struct FakeBackend {
        catalog: Catalog,
        store: InMemorySessionStore,
        online: AtomicBool,
        exits: Mutex<Vec<SessionId>>,

        /// When set, progression calls answer 500 while the rest succeeds.
        rejecting: AtomicBool,

        /// Canned progression replies, served before the store is consulted.
        scripted: Mutex<VecDeque<Progress>>,
    }

    impl FakeBackend {
        fn new() -> Self {
            Self {
                catalog: data::embedded().unwrap(),
                store: InMemorySessionStore::new(),
                online: AtomicBool::new(true),
                exits: Mutex::new(Vec::new()),
                rejecting: AtomicBool::new(false),
                scripted: Mutex::new(VecDeque::new()),
            }
        }

        fn offline() -> Self {
            let backend = Self::new();
            backend.set_online(false);
            backend
        }

        fn reject_progress(&self) {
            self.rejecting.store(true, Ordering::SeqCst);
        }

        fn script(&self, reply: Progress) {
            self.scripted.lock().unwrap().push_back(reply);
        }

        fn set_online(&self, online: bool) {
            self.online.store(online, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), ClientError> {
            if self.online.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(ClientError::ApiError {
                    status: 503,
                    message: "unreachable".to_string(),
                })
            }
        }
    }

    #[async_trait]
    impl QuizBackend for FakeBackend {
        async fn hello(&self) -> Result<Catalog, ClientError> {
            self.check()?;
            Ok(self.catalog.clone())
        }

        async fn start_quiz(
            &self,
            quiz_id: &str,
            topic_id: &str,
        ) -> Result<StartQuizResponse, ClientError> {
            self.check()?;
            let quiz = self
                .catalog
                .quiz(topic_id, quiz_id)
                .cloned()
                .ok_or(ClientError::ApiError {
                    status: 404,
                    message: "Quiz not found".to_string(),
                })?;
            let session_id = self.store.create(topic_id, quiz.clone()).await.unwrap();
            Ok(StartQuizResponse { session_id, quiz })
        }

        async fn progress(
            &self,
            session_id: SessionId,
            answer_id: Option<&str>,
        ) -> Result<Progress, ClientError> {
            self.check()?;
            if self.rejecting.load(Ordering::SeqCst) {
                return Err(ClientError::ApiError {
                    status: 500,
                    message: "Internal Server Error".to_string(),
                });
            }
            if let Some(reply) = self.scripted.lock().unwrap().pop_front() {
                return Ok(reply);
            }
            self.store
                .progress(session_id, answer_id)
                .await
                .unwrap()
                .ok_or(ClientError::ApiError {
                    status: 404,
                    message: "Session not found".to_string(),
                })
        }

        async fn exit(&self, session_id: SessionId) -> Result<(), ClientError> {
            self.check()?;
            self.exits.lock().unwrap().push(session_id);
            self.store.delete(session_id).await.unwrap();
            Ok(())
        }
    }

    async fn at_quiz_intro(backend: FakeBackend, topic_id: &str, quiz_id: &str) -> QuizApp<FakeBackend> {
        let mut app = QuizApp::new(backend);
        app.initialize().await.unwrap();
        app.select_topic(topic_id).unwrap();
        app.select_quiz(quiz_id).await.unwrap();
        app
    }

    async fn answer_all(app: &mut QuizApp<FakeBackend>, answers: &[&str]) {
        app.start().await.unwrap();
        answer_all_after_start(app, answers).await;
    }

    async fn answer_all_after_start(app: &mut QuizApp<FakeBackend>, answers: &[&str]) {
        for answer in answers {
            app.choose_answer(answer).unwrap();
            app.submit().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_initialize_online() {
        let mut app = QuizApp::new(FakeBackend::new());
        assert_eq!(app.view(), &View::Loading);

        app.initialize().await.unwrap();

        assert_eq!(app.view(), &View::Topics);
        assert!(app.banner().is_none());
        assert_eq!(app.catalog().unwrap().app.subtitle, "Learn • Grow • Achieve");
    }

    #[tokio::test]
    async fn test_initialize_offline_uses_local_catalog() {
        let mut app = QuizApp::new(FakeBackend::offline());
        app.initialize().await.unwrap();

        assert_eq!(app.view(), &View::Topics);
        assert!(app.banner().unwrap().starts_with("Cannot connect to server"));
        assert!(app.catalog().unwrap().app.subtitle.ends_with("(Offline Mode)"));
    }

    #[tokio::test]
    async fn test_online_run_scores_on_server() {
        let mut app = at_quiz_intro(FakeBackend::new(), "1", "1").await;
        assert_eq!(app.view().name(), "get-ready");
        let session = app.session_id().unwrap();

        answer_all(&mut app, &["1", "2"]).await;

        let results = app.view().results().unwrap();
        assert_eq!((results.correct, results.total, results.percentage), (2, 2, 100));
        assert!(app.session_id().is_none());
        assert!(app.backend().store.get(session).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_offline_run_matches_online_scoring() {
        let mut online = at_quiz_intro(FakeBackend::new(), "1", "1").await;
        answer_all(&mut online, &["2", "2"]).await;

        let mut offline = at_quiz_intro(FakeBackend::offline(), "1", "1").await;
        assert_eq!(offline.banner(), Some(START_FAILED));
        assert!(offline.is_offline());
        answer_all(&mut offline, &["2", "2"]).await;

        let online = online.view().results().unwrap();
        let offline = offline.view().results().unwrap();
        assert_eq!(online, offline);
        assert_eq!((online.correct, online.total, online.percentage), (1, 2, 50));
    }

    #[tokio::test]
    async fn test_server_lost_mid_quiz_scores_locally() {
        let mut app = at_quiz_intro(FakeBackend::new(), "4", "401").await;
        app.start().await.unwrap();
        app.choose_answer("4").unwrap();
        app.submit().await.unwrap();
        assert!(app.session_id().is_some());

        app.backend().set_online(false);
        app.choose_answer("1").unwrap();
        app.submit().await.unwrap();

        assert_eq!(app.view().name(), "results");
        assert_eq!(app.banner(), Some(CONNECTION_LOST));
        assert!(app.session_id().is_none());
        let results = app.view().results().unwrap();
        assert_eq!((results.correct, results.total), (1, 3));
        assert_eq!(results.percentage, 33);
    }

    #[tokio::test]
    async fn test_server_lost_at_start_continues_offline() {
        let mut app = at_quiz_intro(FakeBackend::new(), "4", "401").await;
        assert!(app.session_id().is_some());

        app.backend().set_online(false);
        app.start().await.unwrap();

        assert_eq!(app.view().name(), "quiz");
        assert_eq!(app.banner(), Some(CONTINUING_OFFLINE));
        assert!(app.session_id().is_none());
        assert!(app.is_offline());

        for answer in ["4", "1", "4"] {
            app.choose_answer(answer).unwrap();
            app.submit().await.unwrap();
        }

        let results = app.view().results().unwrap();
        assert_eq!((results.correct, results.total, results.percentage), (2, 3, 67));
        assert!(app.backend().exits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_rejected_by_server_discards_session() {
        let mut app = at_quiz_intro(FakeBackend::new(), "1", "1").await;
        let session = app.session_id().unwrap();

        app.backend().reject_progress();
        app.start().await.unwrap();

        assert_eq!(app.banner(), Some(CONTINUING_OFFLINE));
        assert!(app.session_id().is_none());
        assert_eq!(*app.backend().exits.lock().unwrap(), vec![session]);
        assert_eq!(app.backend().store.count().await.unwrap(), 0);

        answer_all_after_start(&mut app, &["1", "2"]).await;
        let results = app.view().results().unwrap();
        assert_eq!((results.correct, results.total, results.percentage), (2, 2, 100));
    }

    #[tokio::test]
    async fn test_start_completing_immediately_shows_results() {
        let mut app = at_quiz_intro(FakeBackend::new(), "1", "1").await;
        app.backend().script(Progress::complete(calculate_score(&[], &[])));

        app.start().await.unwrap();

        assert_eq!(app.view().name(), "results");
        assert!(app.session_id().is_none());
        assert!(app.banner().is_none());
        let results = app.view().results().unwrap();
        assert_eq!((results.correct, results.total, results.percentage), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_question_after_last_scores_locally() {
        let mut app = at_quiz_intro(FakeBackend::new(), "1", "1").await;
        let session = app.session_id().unwrap();
        app.start().await.unwrap();
        app.choose_answer("1").unwrap();
        app.submit().await.unwrap();

        let stray = app.view().quiz().unwrap().questions[0].clone();
        app.backend().script(Progress::next(stray, 3, 2));
        app.choose_answer("2").unwrap();
        app.submit().await.unwrap();

        assert_eq!(app.view().name(), "results");
        assert_eq!(app.banner(), Some(CONNECTION_LOST));
        assert!(app.session_id().is_none());
        assert_eq!(*app.backend().exits.lock().unwrap(), vec![session]);
        let results = app.view().results().unwrap();
        assert_eq!((results.correct, results.total, results.percentage), (2, 2, 100));
    }

    #[tokio::test]
    async fn test_exit_mid_quiz_discards_server_session() {
        let mut app = at_quiz_intro(FakeBackend::new(), "1", "1").await;
        let session = app.session_id().unwrap();
        app.start().await.unwrap();
        app.choose_answer("1").unwrap();

        app.exit().await;

        assert_eq!(app.view(), &View::Topics);
        assert!(app.session_id().is_none());
        assert!(app.answers().is_empty());
        assert_eq!(*app.backend().exits.lock().unwrap(), vec![session]);
        assert!(app.backend().store.progress(session, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exit_survives_unreachable_server() {
        let mut app = at_quiz_intro(FakeBackend::new(), "1", "1").await;
        app.backend().set_online(false);

        app.exit().await;

        assert_eq!(app.view(), &View::Topics);
        assert!(app.session_id().is_none());
    }

    #[tokio::test]
    async fn test_selecting_new_quiz_resets_answers() {
        let mut app = at_quiz_intro(FakeBackend::new(), "1", "1").await;
        answer_all(&mut app, &["1", "2"]).await;
        assert_eq!(app.answers().len(), 2);

        app.back_to_quizzes().await.unwrap();
        app.select_quiz("2").await.unwrap();

        assert!(app.answers().is_empty());
        assert_eq!(app.view().quiz().unwrap().title, "Geometry Mastery");
        app.start().await.unwrap();
        assert_eq!(app.current_question().unwrap().id, "1");
        assert!(app.selected_answer().is_none());
    }

    #[tokio::test]
    async fn test_retry_opens_fresh_session() {
        let mut app = at_quiz_intro(FakeBackend::new(), "3", "4").await;
        let first = app.session_id().unwrap();
        answer_all(&mut app, &["2"]).await;
        app.review().unwrap();

        app.retry().await.unwrap();

        assert_eq!(app.view().name(), "get-ready");
        let second = app.session_id().unwrap();
        assert_ne!(first, second);
        assert!(app.answers().is_empty());
    }

    #[tokio::test]
    async fn test_missing_quiz_offline_returns_to_topics() {
        let mut app = QuizApp::new(FakeBackend::offline());
        app.initialize().await.unwrap();
        app.select_topic("8").unwrap();

        app.select_quiz("nope").await.unwrap();

        assert_eq!(app.view(), &View::Topics);
        assert!(app.banner().unwrap().ends_with("Quiz data missing."));
    }

    #[tokio::test]
    async fn test_review_rows_mark_each_answer() {
        let mut app = at_quiz_intro(FakeBackend::new(), "1", "2").await;
        answer_all(&mut app, &["3", "1"]).await;
        app.review().unwrap();

        let rows = app.review_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].number, rows[0].chosen, rows[0].is_correct), (1, Some("3"), true));
        assert_eq!((rows[1].number, rows[1].chosen, rows[1].is_correct), (2, Some("1"), false));

        app.back_to_results().unwrap();
        assert_eq!(app.view().name(), "results");
    }

    #[tokio::test]
    async fn test_progress_percentage_counts_current_question() {
        let mut app = at_quiz_intro(FakeBackend::new(), "4", "401").await;
        app.start().await.unwrap();
        let first = app.progress_percentage().unwrap();
        assert!((first - 100.0 / 3.0).abs() < 1e-9);

        app.choose_answer("4").unwrap();
        app.submit().await.unwrap();
        let second = app.progress_percentage().unwrap();
        assert!((second - 200.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_invalid_actions_are_rejected() {
        let mut app = QuizApp::new(FakeBackend::new());
        assert!(matches!(
            app.select_topic("1"),
            Err(ClientError::InvalidAction { view: "loading", .. })
        ));

        let mut app = at_quiz_intro(FakeBackend::new(), "1", "1").await;
        assert!(app.review().is_err());
        assert_eq!(app.view().name(), "get-ready");

        app.start().await.unwrap();
        assert!(matches!(
            app.submit().await,
            Err(ClientError::InvalidAction { .. })
        ));
        assert!(matches!(
            app.choose_answer("9"),
            Err(ClientError::NotFound { kind: "option", .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_topic_is_not_found() {
        let mut app = QuizApp::new(FakeBackend::new());
        app.initialize().await.unwrap();
        let err = app.select_topic("99").unwrap_err();
        assert!(!err.is_network());
        assert_eq!(app.view(), &View::Topics);
    }
}
