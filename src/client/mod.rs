//! Quiz client
//!
//! Talks to the quiz service over HTTP and drives the screen flow, degrading
//! to the embedded catalog and local scoring when the service is unreachable.

pub mod api;
pub mod app;
pub mod error;

pub use api::{ApiClient, QuizBackend};
pub use app::{QuizApp, ReviewRow, View};
pub use error::ClientError;
