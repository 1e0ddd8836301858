use std::path::PathBuf;

use reqwest::StatusCode;

/// Why an upstream request did not produce an [`crate::Observation`].
#[derive(Debug, thiserror::Error)]
pub enum ExternalFailure {
    #[error("request could not be completed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("response body is not valid JSON for the expected schema: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("response is missing `{0}`")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for ExternalFailure {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter.
        Self::Transport(err.without_url())
    }
}

impl From<serde_json::Error> for ExternalFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// The single error kind surfaced for upstream problems. The underlying
/// [`ExternalFailure`] is kept as the error source.
#[derive(Debug, thiserror::Error)]
#[error("External API request failed")]
pub struct ExternalServiceError {
    #[source]
    cause: ExternalFailure,
}

impl ExternalServiceError {
    pub fn cause(&self) -> &ExternalFailure {
        &self.cause
    }

    pub fn is_timeout(&self) -> bool {
        matches!(&self.cause, ExternalFailure::Transport(err) if err.is_timeout())
    }

    pub fn status(&self) -> Option<StatusCode> {
        match &self.cause {
            ExternalFailure::Status { status, .. } => Some(*status),
            ExternalFailure::Transport(err) => err.status(),
            _ => None,
        }
    }
}

impl From<ExternalFailure> for ExternalServiceError {
    fn from(cause: ExternalFailure) -> Self {
        Self { cause }
    }
}

impl From<reqwest::Error> for ExternalServiceError {
    fn from(err: reqwest::Error) -> Self {
        ExternalFailure::from(err).into()
    }
}

impl From<serde_json::Error> for ExternalServiceError {
    fn from(err: serde_json::Error) -> Self {
        ExternalFailure::from(err).into()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to create database directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Failure of a whole ingestion run.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("configuration unavailable: {0:#}")]
    Config(anyhow::Error),

    #[error(transparent)]
    External(#[from] ExternalServiceError),

    #[error("failed to store weather record")]
    Storage(#[from] StorageError),
}
