//! Error types for the quiz client

use thiserror::Error;

/// Errors raised by the quiz client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or undecodable body
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// `error` field of the body, or the raw body
        message: String,
    },

    /// The action is not available on the current screen
    #[error("Cannot {action} from the {view} screen")]
    InvalidAction {
        action: &'static str,
        view: &'static str,
    },

    /// A topic, quiz, or option id that the catalog does not contain
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
}

impl ClientError {
    /// Whether the failure came from talking to the server, as opposed to a
    /// misuse of the state machine.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ClientError::RequestError(_) | ClientError::ApiError { .. }
        )
    }
}
