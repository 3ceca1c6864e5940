//! Error types for Coding open-api operations.

use thiserror::Error;

use crate::platform::ScmError;

/// Errors that can occur when talking to the Coding open-api.
#[derive(Debug, Error)]
pub enum CodingError {
    /// HTTP transport failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success HTTP status; the body is not inspected.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Error object embedded in an otherwise successful envelope.
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    /// Repository identifier is not `namespace/name` or `user/namespace/name`.
    #[error("invalid repo name, must be orgname/reponame: {0}")]
    InvalidRepoName(String),

    /// Depot clone URL could not be split into owner, project and name.
    #[error("invalid clone url: {0}")]
    InvalidCloneUrl(String),

    /// No repository with this name in the project.
    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    /// Envelope decoded without the payload the action promises.
    #[error("missing {0} in response")]
    MissingPayload(&'static str),

    /// Repository id is not the numeric depot id.
    #[error("invalid depot id: {0}")]
    InvalidDepotId(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Writing a raw response into the caller's sink failed.
    #[error("failed to write response body: {0}")]
    Sink(#[source] std::io::Error),
}

impl From<CodingError> for ScmError {
    fn from(err: CodingError) -> Self {
        match err {
            CodingError::Http(message) => ScmError::Network { message },
            CodingError::Json(e) => ScmError::Internal {
                message: format!("JSON parse error: {e}"),
            },
            CodingError::Status { status, message } => ScmError::Status { status, message },
            CodingError::Api { message, .. } => ScmError::Api { message },
            e @ CodingError::InvalidRepoName(_) => ScmError::InvalidInput {
                message: e.to_string(),
            },
            CodingError::RepoNotFound(repo) => ScmError::NotFound {
                resource: format!("repository: {repo}"),
            },
            e @ (CodingError::InvalidCloneUrl(_)
            | CodingError::MissingPayload(_)
            | CodingError::InvalidDepotId(_)
            | CodingError::Config(_)
            | CodingError::Sink(_)) => ScmError::Internal {
                message: e.to_string(),
            },
        }
    }
}
